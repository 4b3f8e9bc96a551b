// Workflow Executor - runs one workflow's action list against one event

use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::actions::{Action, ActionOutcome, ActionStatus, WorkflowRunSummary};
use super::registry::{ActionContext, ActionOutput, ActionRegistry};
use super::store::Workflow;
use super::triggers::Event;
use crate::services::metrics::AutomationMetrics;

/// Executes a workflow's actions strictly in stored order, one at a time,
/// isolating every per-action failure.
#[derive(Debug, Clone)]
pub struct WorkflowExecutor {
    registry: Arc<ActionRegistry>,
    metrics: Arc<AutomationMetrics>,
    action_timeout: Duration,
}

impl WorkflowExecutor {
    pub fn new(
        registry: Arc<ActionRegistry>,
        metrics: Arc<AutomationMetrics>,
        action_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            metrics,
            action_timeout,
        }
    }

    /// Run one workflow to completion. Never fails: every action outcome,
    /// including errors and timeouts, is recorded in the summary.
    pub async fn run(&self, workflow: &Workflow, event: &Event) -> WorkflowRunSummary {
        info!("Executing workflow '{}' ({})", workflow.name, workflow.id);

        let payload = event.payload_json();
        let mut outcomes = Vec::with_capacity(workflow.actions.len());

        for action in &workflow.actions {
            let outcome = self.dispatch(workflow, event, action, &payload).await;

            match outcome.status {
                ActionStatus::Completed => {
                    self.metrics.action_completed();
                    info!(
                        "Action {} completed for workflow {} in {}ms",
                        action.kind.as_str(),
                        workflow.id,
                        outcome.duration_ms
                    );
                }
                ActionStatus::Failed => {
                    self.metrics.action_failed();
                    error!(
                        "Action {} failed for workflow {}: {}",
                        action.kind.as_str(),
                        workflow.id,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
                ActionStatus::Skipped => {
                    self.metrics.action_skipped();
                    warn!(
                        "Action {} skipped for workflow {}: {}",
                        action.kind.as_str(),
                        workflow.id,
                        outcome.error.as_deref().unwrap_or("no reason given")
                    );
                }
            }

            outcomes.push(outcome);
        }

        WorkflowRunSummary {
            workflow_id: workflow.id,
            workflow_name: workflow.name.clone(),
            outcomes,
        }
    }

    /// Dispatch a single action through the registry.
    ///
    /// The handler runs on its own task so that a panic cannot unwind into
    /// the action loop, and is bounded by the configured timeout. Timeouts
    /// and panics become ordinary failed outcomes.
    async fn dispatch(
        &self,
        workflow: &Workflow,
        event: &Event,
        action: &Action,
        payload: &serde_json::Value,
    ) -> ActionOutcome {
        let Some(handler) = self.registry.get(action.kind) else {
            warn!(
                "No handler registered for action kind {} (workflow {})",
                action.kind.as_str(),
                workflow.id
            );
            return ActionOutcome::skipped(action.kind, "no registered handler for action kind");
        };

        let ctx = ActionContext {
            organization_id: event.organization_id,
            trigger: event.trigger,
            workflow_id: workflow.id,
            workflow_name: workflow.name.clone(),
            config: render_templates(&action.config, payload),
            payload: payload.clone(),
        };

        let start = Instant::now();
        let mut task = tokio::spawn(async move { handler.execute(&ctx).await });

        let outcome = match timeout(self.action_timeout, &mut task).await {
            Ok(Ok(Ok(ActionOutput::Completed(output)))) => {
                ActionOutcome::completed(action.kind, output)
            }
            Ok(Ok(Ok(ActionOutput::Skipped(reason)))) => ActionOutcome::skipped(action.kind, reason),
            Ok(Ok(Err(e))) => ActionOutcome::failed(action.kind, e.to_string()),
            Ok(Err(join_err)) => {
                let reason = if join_err.is_panic() {
                    "action handler panicked"
                } else {
                    "action handler was cancelled"
                };
                ActionOutcome::failed(action.kind, reason)
            }
            Err(_) => {
                task.abort();
                ActionOutcome::failed(
                    action.kind,
                    format!("timed out after {}s", self.action_timeout.as_secs()),
                )
            }
        };

        outcome.with_duration(start.elapsed().as_millis() as i64)
    }
}

// ===== Template substitution =====

fn template_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").expect("template pattern is valid"))
}

/// Resolve `{{field}}` placeholders in every string value of a config tree
/// against the event payload. Unresolvable placeholders are left in place.
pub fn render_templates(config: &serde_json::Value, payload: &serde_json::Value) -> serde_json::Value {
    match config {
        serde_json::Value::String(s) => {
            serde_json::Value::String(replace_template_vars(s, payload))
        }
        serde_json::Value::Object(map) => {
            let rendered = map
                .iter()
                .map(|(k, v)| (k.clone(), render_templates(v, payload)))
                .collect();
            serde_json::Value::Object(rendered)
        }
        serde_json::Value::Array(items) => {
            let rendered = items.iter().map(|v| render_templates(v, payload)).collect();
            serde_json::Value::Array(rendered)
        }
        _ => config.clone(),
    }
}

fn replace_template_vars(template: &str, payload: &serde_json::Value) -> String {
    let mut result = template.to_string();

    for cap in template_re().captures_iter(template) {
        let path = cap[1].trim();
        let Some(value) = get_nested_value(payload, path) else {
            continue;
        };

        let replacement = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        };

        result = result.replace(&cap[0], &replacement);
    }

    result
}

fn get_nested_value<'a>(
    json: &'a serde_json::Value,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut current = json;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_placeholders_from_payload() {
        let payload = serde_json::json!({
            "name": "Ada",
            "booking": { "service": "consultation" }
        });

        let rendered = replace_template_vars("Hi {{name}}, your {{booking.service}} is set", &payload);
        assert_eq!(rendered, "Hi Ada, your consultation is set");
    }

    #[test]
    fn unresolvable_placeholders_are_left_alone() {
        let payload = serde_json::json!({ "name": "Ada" });
        let rendered = replace_template_vars("Hi {{nickname}}", &payload);
        assert_eq!(rendered, "Hi {{nickname}}");
    }

    #[test]
    fn renders_nested_config_structures() {
        let payload = serde_json::json!({ "email": "ada@example.com", "count": 3 });
        let config = serde_json::json!({
            "to": "{{email}}",
            "lines": ["{{count}} new items", 7],
            "flag": true
        });

        let rendered = render_templates(&config, &payload);
        assert_eq!(rendered["to"], "ada@example.com");
        assert_eq!(rendered["lines"][0], "3 new items");
        assert_eq!(rendered["lines"][1], 7);
        assert_eq!(rendered["flag"], true);
    }
}
