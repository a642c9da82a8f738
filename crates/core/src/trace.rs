//! Turns a chat response into the "thinking process" shown to the user
//! and the trace kept on the answer.

use std::collections::BTreeMap;

use agent_chat_protocol::{ChatResponse, IterationDetail, RoutingTrail};

use crate::conversation::{RoutingStep, ThinkingStep, Trace};

/// Headline of the step shown before the backend answers.
pub const ANALYZING_STEP: &str = "Analyzing query...";

/// Detail of the agent step when the backend gave no reasoning.
pub const DEFAULT_SELECTION_DETAIL: &str = "Selected best agent";

/// Trace reasoning of an iterated answer whose first detail has none.
pub const DEFAULT_REASONING: &str = "No reasoning provided";

const ROUTED_MARKER: &str = "Routed to ";

/// The output of [`reconstruct`].
#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    /// Steps to display until the answer is committed.
    pub steps: Vec<ThinkingStep>,
    /// The trace to attach to the answer.
    pub trace: Trace,
}

/// Derives the thinking steps and the trace of a response.
///
/// Always yields the analysis, agent, confidence and processing time
/// steps. A response spanning several iterations gets an extra flow
/// summary right after the analysis step.
pub fn reconstruct(resp: &ChatResponse) -> Reconstruction {
    let (selection_detail, reasoning, flow, routing) = match &resp.routing {
        RoutingTrail::History(history) => {
            let first = history.first().and_then(|e| e.reasoning.clone());
            let routing: Vec<_> =
                history.iter().map(RoutingStep::from).collect();
            (first.clone(), first, None, routing)
        }
        RoutingTrail::Iterations(details) => {
            let first = details.first().and_then(|d| d.reasoning.clone());
            let reasoning =
                first.clone().unwrap_or_else(|| DEFAULT_REASONING.to_owned());
            let routing: Vec<_> =
                details.iter().map(RoutingStep::from).collect();
            (first, Some(reasoning), summarize_flow(details), routing)
        }
        RoutingTrail::Missing => (None, None, None, Vec::new()),
    };

    let mut steps = Vec::with_capacity(5);
    steps.push(ThinkingStep::done(
        "🎯 Query Analysis",
        "Analyzed user intent and context",
    ));
    steps.extend(flow);
    steps.push(ThinkingStep::done(
        format!("🤖 Agent Selection: {}", resp.agent_used),
        selection_detail
            .unwrap_or_else(|| DEFAULT_SELECTION_DETAIL.to_owned()),
    ));
    steps.push(ThinkingStep::done(
        format!("📊 Confidence: {}", format_percent(resp.confidence)),
        "Routing confidence score",
    ));
    steps.push(ThinkingStep::done(
        format!(
            "⚡ Processing Time: {}",
            format_millis(resp.processing_time_ms)
        ),
        "Total execution time",
    ));

    Reconstruction {
        steps,
        trace: Trace {
            reasoning,
            processing_time_ms: resp.processing_time_ms,
            iterations: resp.iterations,
            routing,
        },
    }
}

fn summarize_flow(details: &[IterationDetail]) -> Option<ThinkingStep> {
    let mut iterations: BTreeMap<u32, Vec<&IterationDetail>> = BTreeMap::new();
    for detail in details {
        iterations.entry(detail.iteration).or_default().push(detail);
    }
    if iterations.len() < 2 {
        return None;
    }

    let fragments: Vec<_> = iterations
        .iter()
        .filter_map(|(iteration, group)| {
            let (agent, confidence) = group
                .iter()
                .find_map(|d| routed_agent(d).map(|a| (a, d.confidence)))
                .or_else(|| {
                    group.first().map(|d| (d.agent.as_str(), d.confidence))
                })?;
            Some(format!(
                "{iteration}: {agent} ({})",
                format_percent(confidence)
            ))
        })
        .collect();

    Some(ThinkingStep::done(
        format!("🔄 Multi-Agent Flow: {} iterations", iterations.len()),
        fragments.join(" → "),
    ))
}

/// Extracts `knowledge` from an action like `Routed to knowledge agent`.
fn routed_agent(detail: &IterationDetail) -> Option<&str> {
    detail
        .action
        .strip_prefix(ROUTED_MARKER)
        .and_then(|rest| rest.split_whitespace().next())
}

/// Formats a `[0, 1]` score as a whole percentage, rounding halves up.
#[inline]
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

/// Formats a duration in whole milliseconds.
#[inline]
pub fn format_millis(ms: f64) -> String {
    format!("{}ms", ms.round() as i64)
}

/// Formats a duration in milliseconds with two decimals.
#[inline]
pub fn format_millis_precise(ms: f64) -> String {
    format!("{ms:.2}ms")
}

/// The sections of a trace, formatted for display.
///
/// Sections whose value is zero or empty are left out, except the
/// reasoning which is always shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracePanel<'a> {
    /// The routing explanation.
    pub reasoning: Option<&'a str>,
    /// Processing time with two decimals.
    pub processing_time: Option<String>,
    /// Number of iterations.
    pub iterations: Option<u32>,
    /// `(agent, percentage)` for every routing step.
    pub routing: Vec<(&'a str, String)>,
}

impl Trace {
    /// Formats the trace for display.
    pub fn panel(&self) -> TracePanel<'_> {
        TracePanel {
            reasoning: self.reasoning.as_deref(),
            processing_time: (self.processing_time_ms > 0.0)
                .then(|| format_millis_precise(self.processing_time_ms)),
            iterations: (self.iterations > 0).then_some(self.iterations),
            routing: self
                .routing
                .iter()
                .map(|step| {
                    (step.agent.as_str(), format_percent(step.confidence))
                })
                .collect(),
        }
    }
}
