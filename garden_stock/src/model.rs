//! Canonical stock data shared by the fetcher, differ and reporter

use std::collections::BTreeMap;
use std::fmt;

/// Shop categories tracked on every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Seeds,
    Eggs,
    Gear,
}

impl Category {
    /// All tracked categories, in report order
    pub const ALL: [Category; 3] = [Category::Seeds, Category::Eggs, Category::Gear];

    /// Path segment appended to the stock API base URL
    pub fn endpoint(self) -> &'static str {
        match self {
            Category::Seeds => "seeds",
            Category::Eggs => "eggs",
            Category::Gear => "gear",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Seeds => "Seeds",
            Category::Eggs => "Eggs",
            Category::Gear => "Gear",
        }
    }

    /// Header emoji used in the Telegram report
    pub fn emoji(self) -> &'static str {
        match self {
            Category::Seeds => "🌱",
            Category::Eggs => "🥚",
            Category::Gear => "⚙️",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical item record, independent of the payload shape it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub name: String,
    pub stock: Option<i64>,
}

impl ItemRecord {
    pub fn new(name: impl Into<String>, stock: Option<i64>) -> Self {
        Self {
            name: name.into(),
            stock,
        }
    }

    /// True when the shop currently sells at least one unit
    pub fn in_stock(&self) -> bool {
        self.stock.is_some_and(|s| s > 0)
    }
}

/// Items of one category keyed by item name
pub type CategoryItems = BTreeMap<String, ItemRecord>;

/// Observed stock for a set of categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    categories: BTreeMap<Category, CategoryItems>,
}

impl Snapshot {
    /// Snapshot with no categories recorded (the state before the first cycle)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot with every tracked category present, all empty
    pub fn all_empty() -> Self {
        let mut snapshot = Self::default();
        for category in Category::ALL {
            snapshot.insert(category, CategoryItems::new());
        }
        snapshot
    }

    pub fn insert(&mut self, category: Category, items: CategoryItems) {
        self.categories.insert(category, items);
    }

    pub fn get(&self, category: Category) -> Option<&CategoryItems> {
        self.categories.get(&category)
    }

    /// True if no category has been recorded at all
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of items over all categories
    pub fn item_count(&self) -> usize {
        self.categories.values().map(|items| items.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryItems)> {
        self.categories.iter().map(|(c, items)| (*c, items))
    }

    /// Build a snapshot from `(category, [(name, stock)])` pairs (for testing)
    #[cfg(test)]
    pub fn from_pairs(pairs: &[(Category, &[(&str, i64)])]) -> Self {
        let mut snapshot = Self::default();
        for (category, items) in pairs {
            let items = items
                .iter()
                .map(|(name, stock)| (name.to_string(), ItemRecord::new(*name, Some(*stock))))
                .collect();
            snapshot.insert(*category, items);
        }
        snapshot
    }
}
