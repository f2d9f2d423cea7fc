//! Dependency graph between tables
//!
//! Table A depends on table B when A has a foreign key referencing B. Sheets
//! are written in topological order so that a referenced table's column ranges
//! are final before any dependent refers to them. A table referencing itself
//! needs no ordering and is not an edge.

use std::collections::BTreeSet;

use tablecloth_core::{Error, Result};

/// Directed graph with one node per table (indexed by package position)
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Table names, by index
    names: Vec<String>,
    /// Table → tables it references (precedents)
    precedents: Vec<BTreeSet<usize>>,
    /// Table → tables referencing it (dependents)
    dependents: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Create a graph with one node per table name, and no edges
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let n = names.len();
        Self {
            names,
            precedents: vec![BTreeSet::new(); n],
            dependents: vec![BTreeSet::new(); n],
        }
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the graph has no tables
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add a dependency: `dependent` references `precedent`
    ///
    /// Self references are ignored.
    pub fn add_dependency(&mut self, dependent: usize, precedent: usize) {
        if dependent == precedent {
            return;
        }
        self.precedents[dependent].insert(precedent);
        self.dependents[precedent].insert(dependent);
    }

    /// Get tables the given table references
    pub fn precedents(&self, table: usize) -> impl Iterator<Item = usize> + '_ {
        self.precedents
            .get(table)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get tables referencing the given table
    pub fn dependents(&self, table: usize) -> impl Iterator<Item = usize> + '_ {
        self.dependents
            .get(table)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Find a cycle, as a path of table indices starting and ending on the same table
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut visited = vec![false; self.len()];
        let mut in_stack = vec![false; self.len()];
        let mut path = Vec::new();

        for table in 0..self.len() {
            if let Some(cycle) = self.detect_cycle(table, &mut visited, &mut in_stack, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn detect_cycle(
        &self,
        table: usize,
        visited: &mut [bool],
        in_stack: &mut [bool],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        if in_stack[table] {
            let start = path.iter().position(|&t| t == table).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(table);
            return Some(cycle);
        }
        if visited[table] {
            return None;
        }

        visited[table] = true;
        in_stack[table] = true;
        path.push(table);

        for precedent in self.precedents(table) {
            if let Some(cycle) = self.detect_cycle(precedent, visited, in_stack, path) {
                return Some(cycle);
            }
        }

        path.pop();
        in_stack[table] = false;
        None
    }

    /// Order in which tables must be laid out and written
    ///
    /// Every table comes after the tables it references. Among tables free to
    /// go next, the one declared first in the package wins.
    ///
    /// # Errors
    ///
    /// [`Error::CyclicReference`] if distinct tables reference each other in a cycle.
    pub fn write_order(&self) -> Result<Vec<usize>> {
        if let Some(cycle) = self.find_cycle() {
            return Err(Error::CyclicReference {
                cycle: cycle.into_iter().map(|t| self.names[t].clone()).collect(),
            });
        }

        let mut pending: Vec<usize> = self.precedents.iter().map(BTreeSet::len).collect();
        let mut ready: BTreeSet<usize> = (0..self.len()).filter(|&t| pending[t] == 0).collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(table) = ready.pop_first() {
            order.push(table);
            for dependent in self.dependents(table) {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        Ok(order)
    }
}
