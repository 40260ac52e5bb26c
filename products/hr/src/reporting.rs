//! Reporting structure: how many unique people sit below an employee.
//!
//! The hierarchy is stored as per-employee lists of direct reports, so the
//! closure is computed by walking the store one frontier at a time. Each
//! frontier is fetched with a single [`EmployeeStore::find_many`] call.

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, instrument, warn};

use crate::{
    error::HrResult,
    model::{Employee, ReportingStructure},
    store::EmployeeStore,
};

#[derive(Clone)]
pub struct ReportingStructureResolver {
    store: Arc<dyn EmployeeStore>,
}

impl ReportingStructureResolver {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Resolve the reporting structure rooted at `employee_id`.
    ///
    /// Returns `Ok(None)` when the root does not exist. Every reachable
    /// employee is counted once no matter how many paths lead to it. The root
    /// is never counted, even if a cycle leads back to it. Dangling references
    /// are treated as leaves and left out of the count.
    #[instrument(name = "hr.reporting_structure", skip(self))]
    pub async fn resolve(&self, employee_id: &str) -> HrResult<Option<ReportingStructure>> {
        let Some(employee) = self.store.find(employee_id).await? else {
            warn!(employee_id, "no employee found for reporting structure");
            return Ok(None);
        };

        let mut walk = Walk::new(&employee);
        let mut frontier: Vec<String> = employee.direct_report_ids().map(str::to_owned).collect();
        while !frontier.is_empty() {
            let pending = walk.unseen(frontier.drain(..));
            if pending.is_empty() {
                break;
            }
            let found = self.store.find_many(&pending).await?;
            for report in &found {
                if walk.visit(report) {
                    frontier.extend(report.direct_report_ids().map(str::to_owned));
                }
            }
            walk.mark_dangling(&pending);
        }

        debug!(
            employee_id,
            reports = walk.visited.len(),
            dangling = walk.dangling.len(),
            "reporting structure resolved"
        );
        Ok(Some(ReportingStructure {
            number_of_reports: walk.visited.len(),
            employee,
        }))
    }
}

/// Traversal state owned by a single `resolve` call.
struct Walk {
    root: String,
    visited: HashSet<String>,
    dangling: HashSet<String>,
}

impl Walk {
    fn new(root: &Employee) -> Self {
        Self {
            root: root.employee_id.clone(),
            visited: HashSet::new(),
            dangling: HashSet::new(),
        }
    }

    /// Ids from `ids` that still need a lookup, deduplicated.
    fn unseen(&self, ids: impl Iterator<Item = String>) -> Vec<String> {
        let mut queued = HashSet::new();
        ids.filter(|id| {
            *id != self.root
                && !self.visited.contains(id)
                && !self.dangling.contains(id)
                && queued.insert(id.clone())
        })
        .collect()
    }

    fn visit(&mut self, employee: &Employee) -> bool {
        employee.employee_id != self.root && self.visited.insert(employee.employee_id.clone())
    }

    fn mark_dangling(&mut self, requested: &[String]) {
        for id in requested {
            if !self.visited.contains(id) && self.dangling.insert(id.clone()) {
                warn!(employee_id = %id, "direct report references unknown employee; skipping");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        memory::InMemoryEmployeeStore,
        model::EmployeeRef,
        store::{StoreError, StoreResult},
    };

    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryEmployeeStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl EmployeeStore for CountingStore {
        async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find(employee_id).await
        }

        async fn find_many(&self, employee_ids: &[String]) -> StoreResult<Vec<Employee>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_many(employee_ids).await
        }

        async fn insert(&self, employee: &Employee) -> StoreResult<()> {
            self.inner.insert(employee).await
        }

        async fn replace(&self, _employee: &Employee) -> StoreResult<bool> {
            Err(StoreError::Backend(anyhow::anyhow!("read only")))
        }
    }

    fn employee(id: &str, reports: &[&str]) -> Employee {
        Employee {
            employee_id: id.into(),
            first_name: "Report".into(),
            last_name: id.into(),
            position: "Developer".into(),
            department: "Engineering".into(),
            direct_reports: reports.iter().copied().map(EmployeeRef::new).collect(),
        }
    }

    async fn org(chart: &[(&str, &[&str])]) -> Arc<CountingStore> {
        let store = CountingStore::default();
        for (id, reports) in chart {
            store.insert(&employee(id, reports)).await.unwrap();
        }
        Arc::new(store)
    }

    async fn count(store: Arc<CountingStore>, root: &str) -> usize {
        ReportingStructureResolver::new(store)
            .resolve(root)
            .await
            .unwrap()
            .expect("root exists")
            .number_of_reports
    }

    #[tokio::test]
    async fn no_reports_counts_zero_with_a_single_lookup() {
        let store = org(&[("root", &[])]).await;
        let resolved = ReportingStructureResolver::new(store.clone())
            .resolve("root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.number_of_reports, 0);
        assert_eq!(resolved.employee.employee_id, "root");
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_report_is_counted_once() {
        let store = org(&[
            ("root", &["a", "b", "c"]),
            ("a", &[]),
            ("b", &["a"]),
            ("c", &[]),
        ])
        .await;
        assert_eq!(count(store, "root").await, 3);
    }

    #[tokio::test]
    async fn nested_reports_are_included() {
        let store = org(&[("root", &["x", "y"]), ("x", &["z"]), ("y", &[]), ("z", &[])]).await;
        assert_eq!(count(store, "root").await, 3);
    }

    #[tokio::test]
    async fn count_ignores_report_order() {
        let forward = org(&[("root", &["a", "b"]), ("a", &["c"]), ("b", &["c"]), ("c", &[])]).await;
        let reverse = org(&[("root", &["b", "a"]), ("a", &["c"]), ("b", &["c"]), ("c", &[])]).await;
        assert_eq!(count(forward, "root").await, 3);
        assert_eq!(count(reverse, "root").await, 3);
    }

    #[tokio::test]
    async fn deep_diamond_fetches_shared_subtree_once() {
        let store = org(&[
            ("root", &["a", "b"]),
            ("a", &["shared"]),
            ("b", &["shared"]),
            ("shared", &["leaf"]),
            ("leaf", &[]),
        ])
        .await;
        assert_eq!(count(store.clone(), "root").await, 4);
        // root + one batch per level: [a, b], [shared], [leaf]
        assert_eq!(store.lookups.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn missing_root_is_absent() {
        let store = org(&[("root", &[])]).await;
        let resolved = ReportingStructureResolver::new(store)
            .resolve("nobody")
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn dangling_reference_is_a_leaf() {
        let store = org(&[("root", &["a", "ghost"]), ("a", &["ghost"])]).await;
        assert_eq!(count(store, "root").await, 1);
    }

    #[tokio::test]
    async fn cycles_terminate_and_exclude_root() {
        let store = org(&[
            ("root", &["a"]),
            ("a", &["b"]),
            ("b", &["a", "root"]),
            ("self", &["self"]),
        ])
        .await;
        assert_eq!(count(store.clone(), "root").await, 2);
        assert_eq!(count(store, "self").await, 0);
    }
}
