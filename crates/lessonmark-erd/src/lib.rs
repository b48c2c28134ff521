//! # ER Layout
//!
//! Grid placement for entity-relationship diagrams in lessons.
//!
//! Tables are grouped into domains. [`layout`] puts the domains on a coarse
//! grid so that heavily linked domains end up adjacent, then lays out each
//! domain's tables around its hub table. Cross-domain links pull a table to
//! the border facing the other domain. The result depends only on the input,
//! so the same schema always yields the same picture.

mod domains;
mod grid;
pub mod model;
mod normalize;
mod tables;

use std::path::{Path, PathBuf};

pub use model::{
    Direction, DomainLayout, DomainSpec, Endpoint, ErdLayout, ErdSchema, GridPos, Relationship,
    TablePlacement,
};

#[derive(Debug, thiserror::Error)]
pub enum ErdError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema format {0:?}, expected .toml or .json")]
    UnsupportedFormat(PathBuf),
}

impl ErdSchema {
    pub fn from_toml_str(content: &str) -> Result<Self, ErdError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ErdError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads a schema, choosing the format by file extension.
    pub fn load(path: &Path) -> Result<Self, ErdError> {
        let parse = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ErdError::UnsupportedFormat(path.to_path_buf())),
        };
        let content = std::fs::read_to_string(path).map_err(|source| ErdError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&content)
    }
}

/// Computes the diagram layout. Never fails: unknown tables and self links
/// are skipped, empty domains dropped and unlinked tables placed by fill.
pub fn layout(schema: &ErdSchema) -> ErdLayout {
    let graph = normalize::normalize(schema);
    let (shape, domain_cells) = domains::place_domains(&graph.domain_weights());

    let mut directions: Vec<Vec<Vec<Direction>>> = graph
        .domains
        .iter()
        .map(|d| vec![Vec::new(); d.tables.len()])
        .collect();
    for (a, b) in graph.cross_edges() {
        let (from, to) = (domain_cells[a.domain], domain_cells[b.domain]);
        if let Some(dir) = Direction::between(from, to) {
            directions[a.domain][a.table].push(dir);
        }
        if let Some(dir) = Direction::between(to, from) {
            directions[b.domain][b.table].push(dir);
        }
    }

    let domains = graph
        .domains
        .iter()
        .enumerate()
        .zip(domain_cells)
        .map(|((ix, domain), position)| {
            let facing: Vec<Option<Direction>> = directions[ix]
                .iter()
                .map(|dirs| tables::dominant(dirs.iter().copied()))
                .collect();
            let (local, cells) = tables::place_tables(&graph.internal_weights(ix), &facing);
            log::debug!(
                "domain {} at {:?}: {} tables on {}x{}",
                domain.name,
                position,
                domain.tables.len(),
                local.columns,
                local.rows
            );
            DomainLayout {
                name: domain.name.clone(),
                position,
                columns: local.columns,
                rows: local.rows,
                tables: domain
                    .tables
                    .iter()
                    .zip(cells)
                    .zip(facing)
                    .map(|((name, position), facing)| TablePlacement {
                        name: name.clone(),
                        position,
                        facing,
                    })
                    .collect(),
            }
        })
        .collect();

    ErdLayout {
        columns: shape.columns,
        rows: shape.rows,
        domains,
    }
}
