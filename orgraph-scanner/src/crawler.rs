use crate::graph::{
    GraphEdge, GraphNode, LinkCost, NodeKind, NodeStatus, PathStep, RelationPath, SourceRecord,
};
use crate::handle::{CancelToken, CrawlHandle};
use crate::record::{is_valid_siren, EntityRecord, PersonQuery, Representative};
use crate::result::{CrawlError, CrawlOutcome, CrawlResult, CrawlStats};
use crate::risk::{self, RiskAssessment};
use crate::source::EntitySource;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(CrawlStats) + Send + Sync>;

/// Edge label for an ownership link that carries no role.
pub const DEFAULT_CONTROL_LABEL: &str = "Representative";
/// Edge label for links found by reverse mandate search, which returns no titles.
pub const MANDATE_HOLDER_LABEL: &str = "Mandate holder";

pub const DEFAULT_MAX_COST_DEPTH: u32 = 2;
pub const DEFAULT_MAX_NODES: usize = 50;

#[derive(Debug, Clone)]
struct QueueItem {
    siren: String,
    cost_depth: u32,
    /// Path up to, but excluding, this entity.
    path: RelationPath,
    last_relation: Option<String>,
}

/// Accumulators for a single run. Built fresh by every `crawl` call.
struct CrawlSession {
    root: String,
    max_cost_depth: u32,
    max_nodes: usize,
    queue: VecDeque<QueueItem>,
    visited: HashSet<String>,
    searched_persons: HashSet<String>,
    node_index: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    errors: Vec<CrawlError>,
    scanned: usize,
    cost_depth_reached: u32,
    data_source_calls: usize,
    mandate_lookups: usize,
}

impl CrawlSession {
    fn new(root: &str, max_cost_depth: u32, max_nodes: usize) -> Self {
        let mut session = Self {
            root: root.to_string(),
            max_cost_depth,
            max_nodes,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            searched_persons: HashSet::new(),
            node_index: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            errors: Vec::new(),
            scanned: 0,
            cost_depth_reached: 0,
            data_source_calls: 0,
            mandate_lookups: 0,
        };
        session.visited.insert(root.to_string());
        session.queue.push_back(QueueItem {
            siren: root.to_string(),
            cost_depth: 0,
            path: RelationPath::empty(),
            last_relation: None,
        });
        session
    }

    fn budget_exhausted(&self) -> bool {
        self.scanned >= self.max_nodes
    }

    fn stats(&self) -> CrawlStats {
        CrawlStats {
            scanned: self.scanned,
            people_found: self
                .nodes
                .iter()
                .filter(|n| n.kind == NodeKind::Person)
                .count(),
            edges_found: self.edges.len(),
            cost_depth_reached: self.cost_depth_reached,
            errors: self.errors.clone(),
            data_source_calls: self.data_source_calls,
            mandate_lookups: self.mandate_lookups,
        }
    }

    /// Inserts `node` unless its id is already present. Returns whether it was inserted.
    fn insert_node(&mut self, node: GraphNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    fn push_edge(
        &mut self,
        source: &str,
        target: &str,
        label: &str,
        active: bool,
        path: RelationPath,
        cost: LinkCost,
    ) {
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            active,
            path,
            cost,
        });
    }

    /// Marks `siren` visited and queues it, if it is new and the node budget allows.
    fn enqueue(
        &mut self,
        siren: &str,
        cost_depth: u32,
        path: RelationPath,
        last_relation: &str,
    ) -> bool {
        if self.visited.contains(siren) || self.budget_exhausted() {
            return false;
        }
        self.visited.insert(siren.to_string());
        self.queue.push_back(QueueItem {
            siren: siren.to_string(),
            cost_depth,
            path,
            last_relation: Some(last_relation.to_string()),
        });
        true
    }

    fn record_error(&mut self, id: &str, code: u16, message: String) {
        warn!("Skipping {}: {}", id, message);
        self.errors.push(CrawlError::new(id, code, message));
    }

    async fn process(&mut self, source: &dyn EntitySource, item: QueueItem) {
        if !is_valid_siren(&item.siren) {
            self.record_error(
                &item.siren,
                0,
                format!("Malformed identifier: {:?}", item.siren),
            );
            return;
        }

        self.data_source_calls += 1;
        let record = match source.fetch_entity(&item.siren).await {
            Ok(record) => record,
            Err(e) => {
                self.record_error(&item.siren, e.status_code(), e.to_string());
                return;
            }
        };
        self.scanned += 1;

        let kind = if item.siren == self.root {
            NodeKind::Root
        } else {
            NodeKind::Company
        };
        let label = record.display_name();
        debug!(
            "Processing {} ({}) at cost depth {}",
            label, item.siren, item.cost_depth
        );

        let path_self = item.path.extended(PathStep::new(
            label.clone(),
            kind,
            item.last_relation.clone(),
        ));
        let risk = risk::assess(&record);
        if risk.has_alert {
            info!(
                "{} ({}) has {} collective procedure(s)",
                label,
                item.siren,
                risk.procedures.len()
            );
        }

        self.upsert_entity(&item, kind, label, &record, risk);
        self.process_representatives(source, &item, &record, &path_self)
            .await;
        self.process_controlled(&item, &record, &path_self);
    }

    /// Creates the fetched entity's node, or refreshes an existing placeholder in place.
    fn upsert_entity(
        &mut self,
        item: &QueueItem,
        kind: NodeKind,
        label: String,
        record: &EntityRecord,
        risk: RiskAssessment,
    ) {
        let status = NodeStatus::from(record.registration_status());
        let data = SourceRecord::Entity(Box::new(record.clone()));

        let existing = self.node_index.get(&item.siren).copied();
        match existing {
            Some(idx) => {
                let node = &mut self.nodes[idx];
                node.label = label;
                node.status = status;
                node.data = data;
                if kind == NodeKind::Root || node.kind != NodeKind::Root {
                    node.kind = kind;
                }
                node.has_alert = risk.has_alert;
                node.procedures = risk.procedures;
            }
            None => {
                self.insert_node(GraphNode {
                    id: item.siren.clone(),
                    label,
                    kind,
                    status,
                    data,
                    degree: item.cost_depth,
                    has_alert: risk.has_alert,
                    procedures: risk.procedures,
                });
            }
        }
    }

    async fn process_representatives(
        &mut self,
        source: &dyn EntitySource,
        item: &QueueItem,
        record: &EntityRecord,
        path_self: &RelationPath,
    ) {
        let next_depth = item.cost_depth + 1;

        for rep in record
            .representatives
            .iter()
            .filter(|r| !r.is_statutory_auditor())
        {
            let rep_id = rep.node_id();
            let rep_label = rep.label();
            let role = rep.role();

            match rep {
                Representative::Natural(_) => {
                    if item.cost_depth >= self.max_cost_depth {
                        debug!("Cost depth exhausted, skipping {}", rep_label);
                        continue;
                    }

                    self.insert_node(GraphNode {
                        id: rep_id.clone(),
                        label: rep_label.clone(),
                        kind: NodeKind::Person,
                        status: NodeStatus::Active,
                        data: SourceRecord::Representative(rep.clone()),
                        degree: next_depth,
                        has_alert: false,
                        procedures: Vec::new(),
                    });

                    let rep_path = path_self.extended(PathStep::new(
                        rep_label,
                        NodeKind::Person,
                        Some(role.to_string()),
                    ));
                    self.push_edge(
                        &rep_id,
                        &item.siren,
                        role,
                        rep.is_current(),
                        rep_path.clone(),
                        LinkCost::Costly,
                    );

                    if let Some(query) = rep.person_query()
                        && !self.budget_exhausted()
                        && self.searched_persons.insert(rep_id.clone())
                    {
                        self.reverse_lookup(source, item, &rep_id, &query, &rep_path)
                            .await;
                    }
                }
                Representative::Legal(legal) => {
                    self.insert_node(GraphNode {
                        id: rep_id.clone(),
                        label: rep_label.clone(),
                        kind: NodeKind::Company,
                        status: NodeStatus::Unknown,
                        data: SourceRecord::Representative(rep.clone()),
                        degree: next_depth.min(self.max_cost_depth),
                        has_alert: false,
                        procedures: Vec::new(),
                    });

                    let rep_path = path_self.extended(PathStep::new(
                        rep_label,
                        NodeKind::Company,
                        Some(role.to_string()),
                    ));
                    self.push_edge(
                        &rep_id,
                        &item.siren,
                        role,
                        rep.is_current(),
                        rep_path,
                        LinkCost::Costly,
                    );

                    let has_siren = legal
                        .siren
                        .as_deref()
                        .is_some_and(|s| !s.trim().is_empty());
                    if has_siren && next_depth <= self.max_cost_depth {
                        self.enqueue(&rep_id, next_depth, path_self.clone(), role);
                    }
                }
            }
        }
    }

    /// Follows a person to the other entities where they hold a mandate.
    async fn reverse_lookup(
        &mut self,
        source: &dyn EntitySource,
        item: &QueueItem,
        person_id: &str,
        query: &PersonQuery,
        person_path: &RelationPath,
    ) {
        self.mandate_lookups += 1;
        let mandates = match source.search_mandates(query).await {
            Ok(mandates) => mandates,
            Err(e) => {
                self.record_error(
                    person_id,
                    e.status_code(),
                    format!("Mandate lookup failed: {}", e),
                );
                return;
            }
        };

        let next_depth = item.cost_depth + 1;
        for mut mandate in mandates {
            let siren = mandate.siren.trim().to_string();
            if siren.is_empty() || siren == item.siren {
                continue;
            }
            mandate.siren = siren.clone();
            let name = mandate.name.clone();
            self.insert_node(GraphNode::placeholder(
                siren.clone(),
                name.clone(),
                SourceRecord::Mandate(mandate),
                next_depth,
            ));

            let mandate_path = person_path.extended(PathStep::new(
                name,
                NodeKind::Company,
                Some(MANDATE_HOLDER_LABEL.to_string()),
            ));
            self.push_edge(
                person_id,
                &siren,
                MANDATE_HOLDER_LABEL,
                true,
                mandate_path,
                LinkCost::Costly,
            );

            if next_depth <= self.max_cost_depth {
                self.enqueue(
                    &siren,
                    next_depth,
                    person_path.clone(),
                    MANDATE_HOLDER_LABEL,
                );
            }
        }
    }

    fn process_controlled(
        &mut self,
        item: &QueueItem,
        record: &EntityRecord,
        path_self: &RelationPath,
    ) {
        for sub in &record.controlled_entities {
            let Some(siren) = sub
                .siren
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                continue;
            };
            let label = sub.name.clone().unwrap_or_else(|| siren.to_string());
            let role = sub
                .role
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(DEFAULT_CONTROL_LABEL);

            if !self.node_index.contains_key(siren) {
                let mut node = GraphNode::placeholder(
                    siren.to_string(),
                    label.clone(),
                    SourceRecord::Summary(sub.clone()),
                    item.cost_depth,
                );
                if sub.looks_deregistered() {
                    node.status = NodeStatus::Closed;
                }
                self.insert_node(node);
            }

            let sub_path = path_self.extended(PathStep::new(
                label,
                NodeKind::Company,
                Some(role.to_string()),
            ));
            self.push_edge(&item.siren, siren, role, true, sub_path, LinkCost::Free);

            // Ownership descent keeps the current cost depth
            self.enqueue(siren, item.cost_depth, path_self.clone(), role);
        }
    }

    fn into_result(self, outcome: CrawlOutcome) -> CrawlResult {
        let stats = self.stats();
        CrawlResult {
            root: self.root,
            nodes: self.nodes,
            edges: self.edges,
            stats,
            outcome,
        }
    }
}

/// Breadth-first crawler over a registry, bounded by cost depth and node count.
pub struct Crawler {
    source: Arc<dyn EntitySource>,
    max_cost_depth: u32,
    max_nodes: usize,
    progress_callback: Option<ProgressCallback>,
    cancel: CancelToken,
}

impl Crawler {
    pub fn new(source: Arc<dyn EntitySource>) -> Self {
        Self {
            source,
            max_cost_depth: DEFAULT_MAX_COST_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            progress_callback: None,
            cancel: CancelToken::new(),
        }
    }

    /// Maximum number of person- or representative-mediated hops from the root.
    pub fn with_max_cost_depth(mut self, depth: u32) -> Self {
        self.max_cost_depth = depth;
        self
    }

    /// Maximum number of entities fetched successfully in one run.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Runs one crawl to completion, budget exhaustion or cancellation.
    ///
    /// Fetch failures are logged in the returned stats and never abort the run.
    pub async fn crawl(&self, root_siren: &str) -> CrawlResult {
        info!(
            "Starting crawl of {} (max cost depth {}, max nodes {})",
            root_siren, self.max_cost_depth, self.max_nodes
        );

        let mut session = CrawlSession::new(root_siren, self.max_cost_depth, self.max_nodes);
        let mut outcome = CrawlOutcome::Completed;

        while !session.queue.is_empty() {
            if self.cancel.is_cancelled() {
                info!("Crawl cancelled after {} entities", session.scanned);
                outcome = CrawlOutcome::Cancelled;
                break;
            }
            // Checked before dequeuing so no call is spent past the budget
            if session.budget_exhausted() {
                info!("Node budget of {} reached", self.max_nodes);
                outcome = CrawlOutcome::BudgetReached;
                break;
            }
            let Some(item) = session.queue.pop_front() else {
                break;
            };

            session.cost_depth_reached = session.cost_depth_reached.max(item.cost_depth);
            if let Some(ref callback) = self.progress_callback {
                callback(session.stats());
            }

            session.process(self.source.as_ref(), item).await;
        }

        let result = session.into_result(outcome);
        info!(
            "Crawl {}: {} entities scanned, {} nodes, {} edges, {} errors",
            outcome.as_str(),
            result.stats.scanned,
            result.nodes.len(),
            result.edges.len(),
            result.stats.errors.len()
        );
        result
    }

    /// Spawns the crawl on the tokio runtime and returns a handle to observe,
    /// cancel or await it.
    pub fn start(self, root_siren: impl Into<String>) -> CrawlHandle {
        let root_siren = root_siren.into();
        let (tx, rx) = watch::channel(CrawlStats::default());
        let tx = Arc::new(tx);
        let cancel = self.cancel.clone();

        let callback_tx = tx.clone();
        let user_callback = self.progress_callback.clone();
        let crawler = self.with_progress_callback(Arc::new(move |stats: CrawlStats| {
            if let Some(ref callback) = user_callback {
                callback(stats.clone());
            }
            callback_tx.send_replace(stats);
        }));

        let task = tokio::spawn(async move {
            let result = crawler.crawl(&root_siren).await;
            tx.send_replace(result.stats.clone());
            result
        });

        CrawlHandle {
            cancel,
            progress: rx,
            task,
        }
    }
}
