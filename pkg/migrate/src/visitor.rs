//! Generic walk over every legacy authorization object.
//!
//! For each object a visit function decides whether the object needs the
//! action at all, then the action runs and the outcome is tallied. Objects
//! are processed one at a time; a failed object never stops the walk.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{info, warn};

use pkg_client::ObjectClient;
use pkg_types::object::{AuthorizationObject, HasMetadata, ObjectKind};

use crate::error::MigrateError;

// --- Reporters ---

/// Result of a visit function.
pub trait Reporter {
    /// True if the object requires the action to run.
    fn changed(&self) -> bool;
}

pub struct ReporterBool(pub bool);

impl Reporter for ReporterBool {
    fn changed(&self) -> bool {
        self.0
    }
}

/// Visit function that sends every object to the action.
///
/// Used by read-only checks where the action itself decides the outcome;
/// `true` here says nothing about whether the object actually differs.
pub fn always_requires_migration(
    _obj: &AuthorizationObject,
) -> Result<Option<ReporterBool>, MigrateError> {
    Ok(Some(ReporterBool(true)))
}

// --- Actions ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Migrated,
    Unchanged,
}

/// Work performed on each object the visit function selected.
#[async_trait]
pub trait MigrateAction: Send + Sync {
    async fn act(&self, obj: &AuthorizationObject) -> Result<ActionOutcome, MigrateError>;
}

// --- Key filter ---

/// Selects objects by key range and namespace.
///
/// Keys are `namespace/name` for namespaced kinds and `name` otherwise.
/// With a namespace restriction, cluster-scoped objects are skipped.
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    pub from_key: Option<String>,
    pub to_key: Option<String>,
    pub namespace: Option<String>,
}

impl KeyFilter {
    pub fn matches(&self, obj: &AuthorizationObject) -> bool {
        if let Some(ns) = &self.namespace {
            if !obj.kind().is_namespaced() || obj.metadata().namespace != *ns {
                return false;
            }
        }
        let key = obj.key();
        if let Some(from) = &self.from_key {
            if *from > key {
                return false;
            }
        }
        if let Some(to) = &self.to_key {
            if *to <= key {
                return false;
            }
        }
        true
    }
}

// --- Tracking ---

enum Attempt {
    Success,
    Unchanged,
    Ignored,
    Error(MigrateError),
}

/// Counts for one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub found: usize,
    pub ignored: usize,
    pub unchanged: usize,
    pub errors: usize,
    /// Errors presumed transient; rechecking later may clear them.
    pub retriable: usize,
    /// Resource names (e.g. `rolebindings`) that had at least one error.
    pub resources_with_errors: BTreeSet<String>,
}

impl Summary {
    pub fn migrated(&self) -> usize {
        self.found - self.errors - self.unchanged - self.ignored
    }

    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

struct Tracker<'a, W: Write> {
    out: &'a mut W,
    verbose: bool,
    summary: Summary,
}

impl<'a, W: Write> Tracker<'a, W> {
    fn report(
        &mut self,
        prefix: &str,
        obj: &AuthorizationObject,
        err: Option<&MigrateError>,
    ) -> std::io::Result<()> {
        let meta = obj.metadata();
        let ns = if meta.namespace.is_empty() {
            String::new()
        } else {
            format!("-n {} ", meta.namespace)
        };
        let ts = Utc::now().format("%m%d %H:%M:%S%.6f");
        let resource = obj.kind().resource();
        match err {
            Some(err) => {
                let tag = if err.is_retriable() { " (retriable)" } else { "" };
                writeln!(
                    self.out,
                    "E{} {:<10} {}{}/{}: {}{}",
                    ts, prefix, ns, resource, meta.name, err, tag
                )
            }
            None => writeln!(self.out, "I{} {:<10} {}{}/{}", ts, prefix, ns, resource, meta.name),
        }
    }

    fn record(&mut self, obj: &AuthorizationObject, attempt: Attempt) -> std::io::Result<()> {
        self.summary.found += 1;
        match attempt {
            Attempt::Error(err) => {
                self.report("error:", obj, Some(&err))?;
                self.summary.errors += 1;
                if err.is_retriable() {
                    self.summary.retriable += 1;
                }
                self.summary
                    .resources_with_errors
                    .insert(obj.kind().resource().to_string());
            }
            Attempt::Ignored => {
                self.summary.ignored += 1;
                if self.verbose {
                    self.report("ignored:", obj, None)?;
                }
            }
            Attempt::Unchanged => {
                self.summary.unchanged += 1;
                if self.verbose {
                    self.report("unchanged:", obj, None)?;
                }
            }
            Attempt::Success => {
                if self.verbose {
                    self.report("migrated:", obj, None)?;
                }
            }
        }
        Ok(())
    }
}

// --- Visitor ---

/// Lists objects of the configured kinds and runs the action on each.
#[derive(Debug, Clone)]
pub struct ResourceVisitor {
    pub kinds: Vec<ObjectKind>,
    /// `None` walks all namespaces.
    pub namespace: Option<String>,
    pub filter: KeyFilter,
    /// Also report ignored, unchanged and migrated objects.
    pub verbose: bool,
}

impl Default for ResourceVisitor {
    fn default() -> Self {
        Self {
            kinds: ObjectKind::ALL.to_vec(),
            namespace: None,
            filter: KeyFilter::default(),
            verbose: false,
        }
    }
}

impl ResourceVisitor {
    /// Walk every object, writing per-object reports and a summary to `out`.
    ///
    /// Returns an error if any object failed or a listing could not be completed.
    pub async fn visit<C, F, R, W>(
        &self,
        client: &C,
        visit_fn: F,
        action: &dyn MigrateAction,
        out: &mut W,
    ) -> anyhow::Result<Summary>
    where
        C: ObjectClient,
        F: Fn(&AuthorizationObject) -> Result<Option<R>, MigrateError>,
        R: Reporter,
        W: Write,
    {
        let mut tracker = Tracker {
            out,
            verbose: self.verbose,
            summary: Summary::default(),
        };

        let mut list_err = None;
        for kind in &self.kinds {
            let objects = match client
                .list_authorization(*kind, self.namespace.as_deref())
                .await
            {
                Ok(objects) => objects,
                Err(e) => {
                    warn!("Listing {} failed: {}", kind.resource(), e);
                    list_err = Some(e);
                    break;
                }
            };
            info!("Visiting {} {}", objects.len(), kind.resource());

            for obj in &objects {
                let attempt = self.attempt(obj, &visit_fn, action).await;
                tracker.record(obj, attempt)?;
            }
        }

        let summary = tracker.summary;
        let out = tracker.out;
        writeln!(
            out,
            "summary: total={} errors={} ignored={} unchanged={} migrated={}",
            summary.found,
            summary.errors,
            summary.ignored,
            summary.unchanged,
            summary.migrated()
        )?;
        if !summary.resources_with_errors.is_empty() {
            let names: Vec<&str> = summary
                .resources_with_errors
                .iter()
                .map(String::as_str)
                .collect();
            writeln!(
                out,
                "info: to rerun only failing resources, add --include={}",
                names.join(",")
            )?;
        }

        if let Some(e) = list_err {
            writeln!(out, "error: exited without processing all resources: {}", e)?;
            anyhow::bail!("exited without processing all resources: {}", e);
        }
        if !summary.is_success() {
            writeln!(
                out,
                "error: {} resources failed to migrate ({} retriable)",
                summary.errors, summary.retriable
            )?;
            anyhow::bail!("{} resources failed to migrate", summary.errors);
        }
        Ok(summary)
    }

    async fn attempt<F, R>(
        &self,
        obj: &AuthorizationObject,
        visit_fn: &F,
        action: &dyn MigrateAction,
    ) -> Attempt
    where
        F: Fn(&AuthorizationObject) -> Result<Option<R>, MigrateError>,
        R: Reporter,
    {
        if !self.filter.matches(obj) {
            return Attempt::Ignored;
        }
        match visit_fn(obj) {
            Err(err) => return Attempt::Error(err),
            Ok(None) => return Attempt::Ignored,
            Ok(Some(reporter)) if !reporter.changed() => return Attempt::Unchanged,
            Ok(Some(_)) => {}
        }
        match action.act(obj).await {
            Ok(ActionOutcome::Migrated) => Attempt::Success,
            Ok(ActionOutcome::Unchanged) => Attempt::Unchanged,
            Err(err) => Attempt::Error(err),
        }
    }
}
