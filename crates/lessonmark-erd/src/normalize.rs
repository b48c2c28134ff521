//! Cleans an [`ErdSchema`] into an index-based graph the placers work on.

use std::collections::HashMap;

use crate::model::ErdSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TableRef {
    pub domain: usize,
    pub table: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Domain {
    pub name: String,
    pub tables: Vec<String>,
}

/// Non-empty domains in declaration order and the relationships that
/// survive normalisation, one entry per relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Graph {
    pub domains: Vec<Domain>,
    pub edges: Vec<(TableRef, TableRef)>,
}

impl Graph {
    /// Symmetric relationship counts between domains, ignoring internal edges.
    pub fn domain_weights(&self) -> Vec<Vec<usize>> {
        let n = self.domains.len();
        let mut weights = vec![vec![0; n]; n];
        for (a, b) in self.cross_edges() {
            weights[a.domain][b.domain] += 1;
            weights[b.domain][a.domain] += 1;
        }
        weights
    }

    pub fn cross_edges(&self) -> impl Iterator<Item = (TableRef, TableRef)> + '_ {
        self.edges
            .iter()
            .copied()
            .filter(|(a, b)| a.domain != b.domain)
    }

    /// Symmetric relationship counts between the tables of one domain.
    pub fn internal_weights(&self, domain: usize) -> Vec<Vec<usize>> {
        let k = self.domains[domain].tables.len();
        let mut weights = vec![vec![0; k]; k];
        for (a, b) in &self.edges {
            if a.domain == domain && b.domain == domain {
                weights[a.table][b.table] += 1;
                weights[b.table][a.table] += 1;
            }
        }
        weights
    }
}

pub(crate) fn normalize(schema: &ErdSchema) -> Graph {
    let mut graph = Graph::default();
    let mut owner: HashMap<&str, TableRef> = HashMap::new();

    for spec in &schema.domains {
        let domain = graph.domains.len();
        let mut tables = Vec::new();
        for name in &spec.tables {
            if let Some(first) = owner.get(name.as_str()) {
                if first.domain != domain {
                    log::debug!(
                        "table {name} already belongs to domain {}, ignoring it in {}",
                        graph.domains[first.domain].name,
                        spec.name
                    );
                }
                continue;
            }
            owner.insert(
                name.as_str(),
                TableRef {
                    domain,
                    table: tables.len(),
                },
            );
            tables.push(name.clone());
        }
        if tables.is_empty() {
            log::debug!("dropping empty domain {}", spec.name);
            continue;
        }
        graph.domains.push(Domain {
            name: spec.name.clone(),
            tables,
        });
    }

    for rel in &schema.relationships {
        let (from, to) = (rel.from.table.as_str(), rel.to.table.as_str());
        let (Some(&a), Some(&b)) = (owner.get(from), owner.get(to)) else {
            log::debug!("ignoring relationship {from} -> {to}: unknown table");
            continue;
        };
        if a == b {
            log::debug!("ignoring self-referencing relationship on {from}");
            continue;
        }
        graph.edges.push((a, b));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DomainSpec, Relationship};
    use pretty_assertions::assert_eq;

    fn domain(name: &str, tables: &[&str]) -> DomainSpec {
        DomainSpec {
            name: name.to_string(),
            tables: tables.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_domains_are_dropped() {
        let schema = ErdSchema {
            domains: vec![domain("a", &["x"]), domain("empty", &[]), domain("b", &["y"])],
            relationships: vec![],
        };

        let graph = normalize(&schema);

        let names: Vec<_> = graph.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_table_keeps_first_domain() {
        let schema = ErdSchema {
            domains: vec![domain("a", &["x", "y"]), domain("b", &["y", "z"])],
            relationships: vec![],
        };

        let graph = normalize(&schema);

        assert_eq!(graph.domains[0].tables, vec!["x", "y"]);
        assert_eq!(graph.domains[1].tables, vec!["z"]);
    }

    #[test]
    fn domain_of_only_duplicates_is_dropped() {
        let schema = ErdSchema {
            domains: vec![domain("a", &["x"]), domain("b", &["x", "x"])],
            relationships: vec![],
        };

        assert_eq!(normalize(&schema).domains.len(), 1);
    }

    #[test]
    fn unknown_tables_and_self_loops_are_ignored() {
        let schema = ErdSchema {
            domains: vec![domain("a", &["x", "y"])],
            relationships: vec![
                Relationship::new("x", "y"),
                Relationship::new("x", "ghost"),
                Relationship::new("y", "y"),
            ],
        };

        let graph = normalize(&schema);

        assert_eq!(
            graph.edges,
            vec![(
                TableRef {
                    domain: 0,
                    table: 0
                },
                TableRef {
                    domain: 0,
                    table: 1
                }
            )]
        );
    }

    #[test]
    fn weights_are_symmetric_and_split_by_scope() {
        let schema = ErdSchema {
            domains: vec![domain("a", &["x", "y"]), domain("b", &["z"])],
            relationships: vec![
                Relationship::new("x", "y"),
                Relationship::new("x", "z"),
                Relationship::new("z", "y"),
            ],
        };

        let graph = normalize(&schema);

        assert_eq!(graph.domain_weights(), vec![vec![0, 2], vec![2, 0]]);
        assert_eq!(graph.internal_weights(0), vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(graph.internal_weights(1), vec![vec![0]]);
    }
}
