use serde::{Deserialize, Serialize};

/// Input: tables grouped into domains plus foreign-key relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErdSchema {
    #[serde(default)]
    pub domains: Vec<DomainSpec>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<String>,
}

/// A foreign key from one table column to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: Endpoint,
    pub to: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Relationship {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Endpoint {
                table: from.to_string(),
                column: None,
            },
            to: Endpoint {
                table: to.to_string(),
                column: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Where a related domain lies, seen from a table's own domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Above,
    Below,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Above,
        Direction::Below,
    ];

    /// Direction of `to` relative to `from`; horizontal offsets win ties.
    pub fn between(from: GridPos, to: GridPos) -> Option<Direction> {
        let dc = to.col as isize - from.col as isize;
        let dr = to.row as isize - from.row as isize;
        if dc == 0 && dr == 0 {
            None
        } else if dc.abs() >= dr.abs() {
            Some(if dc > 0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if dr > 0 {
            Some(Direction::Below)
        } else {
            Some(Direction::Above)
        }
    }
}

/// Output: the domain grid and every table's cell inside its domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErdLayout {
    pub columns: usize,
    pub rows: usize,
    pub domains: Vec<DomainLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLayout {
    pub name: String,
    pub position: GridPos,
    pub columns: usize,
    pub rows: usize,
    /// In declaration order.
    pub tables: Vec<TablePlacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlacement {
    pub name: String,
    pub position: GridPos,
    /// Dominant direction of the table's cross-domain links, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
}

impl ErdLayout {
    pub fn domain(&self, name: &str) -> Option<&DomainLayout> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Domain and cell of a table.
    pub fn table(&self, name: &str) -> Option<(&DomainLayout, GridPos)> {
        self.domains.iter().find_map(|d| {
            d.tables
                .iter()
                .find(|t| t.name == name)
                .map(|t| (d, t.position))
        })
    }
}
