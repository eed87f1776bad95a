//! Shared state for behaviour scenarios.

use std::sync::Arc;

use lsp_types::CompletionItem;
use parking_lot::Mutex;
use splice_config::Config;
use tokio_util::sync::CancellationToken;

use super::{CallKind, MEMBER_CALL_POSITION, MEMBER_CALL_TEXT, member_call_host};
use crate::errors::CompletionError;
use crate::language::Language;
use crate::service::CompletionService;

/// State threaded through the steps of one scenario.
#[derive(Default)]
pub struct TestWorld {
    pub service: Option<CompletionService>,
    pub calls: Option<Arc<Mutex<Vec<CallKind>>>>,
    pub items: Vec<CompletionItem>,
    pub earlier_items: Vec<CompletionItem>,
    pub requested: Option<CompletionItem>,
    pub resolved: Option<Result<CompletionItem, CompletionError>>,
    pub cancel: CancellationToken,
}

impl TestWorld {
    /// Installs a service for Java backed by the member-call host.
    pub fn install(&mut self, config: &Config) {
        let host = member_call_host();
        self.calls = Some(host.calls());
        let mut service = CompletionService::new(config);
        service
            .register_language(Language::Java, Box::new(host))
            .unwrap_or_else(|error| panic!("registration should succeed: {error}"));
        self.service = Some(service);
    }

    pub fn service(&self) -> &CompletionService {
        self.service
            .as_ref()
            .unwrap_or_else(|| panic!("service should be installed"))
    }

    /// Runs a completion request over the member-call buffer.
    pub fn complete(&mut self) {
        let items = self
            .service()
            .compute_completions(
                Language::Java,
                MEMBER_CALL_TEXT,
                MEMBER_CALL_POSITION,
                &CancellationToken::new(),
            )
            .unwrap_or_else(|error| panic!("completion should succeed: {error}"));
        self.earlier_items = std::mem::replace(&mut self.items, items);
    }

    /// Resolves the item labelled `label` from `items`.
    pub fn resolve_from(&mut self, label: &str, earlier: bool) {
        let source = if earlier {
            &self.earlier_items
        } else {
            &self.items
        };
        let item = source
            .iter()
            .find(|item| item.label == label)
            .cloned()
            .unwrap_or_else(|| panic!("no item labelled {label}"));
        let result = self.service().resolve_completion(item.clone(), &self.cancel);
        self.requested = Some(item);
        self.resolved = Some(result);
    }

    pub fn resolved_item(&self) -> &CompletionItem {
        match self.resolved.as_ref() {
            Some(Ok(item)) => item,
            Some(Err(error)) => panic!("resolve failed: {error}"),
            None => panic!("nothing was resolved"),
        }
    }

    pub fn insertion_count(&self) -> usize {
        self.calls.as_ref().map_or(0, |calls| {
            calls
                .lock()
                .iter()
                .filter(|call| **call == CallKind::Insert)
                .count()
        })
    }
}
