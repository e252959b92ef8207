use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

/// Orders tables so that foreign key parents are loaded before their children
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// All tables in load order (parents before children)
    pub fn load_order(&self) -> Result<Vec<&'static TableSchema>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        // Walk in declaration order so the result is stable
        for table in ALL_TABLES {
            self.visit(table.name, &mut visited, &mut temp_visited, &mut result)?;
        }

        Ok(result)
    }

    /// All tables in truncation order (children before parents)
    pub fn truncate_order(&self) -> Result<Vec<&'static TableSchema>> {
        let mut order = self.load_order()?;
        order.reverse();
        Ok(order)
    }

    fn visit(
        &self,
        name: &'static str,
        visited: &mut HashSet<&'static str>,
        temp_visited: &mut HashSet<&'static str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<()> {
        if visited.contains(name) {
            return Ok(());
        }
        if !temp_visited.insert(name) {
            bail!("Circular dependency detected at: {}", name);
        }

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<_> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                if dep != name {
                    self.visit(dep, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        match get_table(name) {
            Some(table) => result.push(table),
            None => bail!("Unknown table: {}", name),
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
