//! Workflow orchestration engine.
//!
//! The WorkflowEngine walks the enabled agents one at a time, narrates their
//! progress into the session log, suspends at checkpoint agents until the
//! [`Gate`] is answered, and finally asks the backend for the real results.

use crate::agents::base::{AgentEvent, ExecutionContext};
use crate::agents::manager::AgentManager;
use crate::backend::models::RunAgentsResponse;
use crate::backend::Backend;
use crate::error::{WorkflowError, WorkflowResult};
use crate::gate::Gate;
use crate::normalizer::normalize_value;
use crate::state::run::{
    abort_run, await_gate, begin_run, complete_agent, complete_run, fail_run, log_to_run,
    resume_run, set_current_agent,
};
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::GlobalConfig;
use atf_protocol::ipc::Event;
use atf_protocol::run_models::WorkflowRun;
use atf_protocol::session_models::MessageKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio_stream::StreamExt;

const NO_INPUT_MESSAGE: &str = "Please select a file first";

/// The main workflow execution engine.
///
/// At most one run executes at a time; a second call to [`WorkflowEngine::run`]
/// while one is in flight is rejected with [`WorkflowError::RunInProgress`].
pub struct WorkflowEngine {
    agent_manager: AgentManager,
    backend: Arc<dyn Backend>,
    gate: Gate,
    settings: GlobalConfig,
    run_lock: Mutex<()>,
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

impl WorkflowEngine {
    /// Create a new WorkflowEngine.
    ///
    /// # Arguments
    ///
    /// * `agent_manager` - Descriptors and the agents that run them
    /// * `backend` - Service that produces the final results
    /// * `settings` - Messages, checkpoint prompt and pacing
    pub fn new(agent_manager: AgentManager, backend: Arc<dyn Backend>, settings: GlobalConfig) -> Self {
        Self {
            agent_manager,
            backend,
            gate: Gate::new(),
            settings,
            run_lock: Mutex::new(()),
        }
    }

    /// The gate checkpoint decisions are delivered through.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn agent_manager(&self) -> &AgentManager {
        &self.agent_manager
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn settings(&self) -> &GlobalConfig {
        &self.settings
    }

    /// Whether a run currently holds the engine.
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Execute the workflow for `input`, recording everything into `run`.
    ///
    /// `run` is replaced by a fresh run before the first agent starts; when
    /// this returns (with or without error) it holds the terminal state.
    ///
    /// # Errors
    ///
    /// - `Validation` if `input` is missing or blank (`run` is untouched)
    /// - `RunInProgress` if another run is executing (`run` is untouched)
    /// - `Network`/`Upstream` if the backend call fails (`run` is `failed`)
    /// - `Agent`/`Gate` if an agent stream or the gate fails (`run` is `failed`)
    pub async fn run(
        &self,
        run: &mut WorkflowRun,
        input: Option<&str>,
        events_tx: &UnboundedSender<Event>,
    ) -> WorkflowResult<()> {
        let input = match input {
            Some(input) if !input.trim().is_empty() => input,
            _ => return Err(WorkflowError::Validation(NO_INPUT_MESSAGE.to_string())),
        };
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| WorkflowError::RunInProgress)?;

        begin_run(run, input, events_tx);
        tracing::info!(run_id = %run.id, input, "workflow started");

        let result = self.walk(run, input, events_tx).await;
        if let Err(err) = &result {
            tracing::warn!(run_id = %run.id, error = %err, "workflow failed");
            log_to_run(
                run,
                events_tx,
                format!("Error: {err}"),
                MessageKind::Error,
                &self.settings.workflow_name,
            );
            fail_run(run, events_tx, err.to_string());
        }
        result
    }

    async fn walk(
        &self,
        run: &mut WorkflowRun,
        input: &str,
        events_tx: &UnboundedSender<Event>,
    ) -> WorkflowResult<()> {
        let pacing = &self.settings.pacing;
        let workflow_name = self.settings.workflow_name.as_str();

        log_to_run(
            run,
            events_tx,
            format!("Starting ATF workflow for file: {input}"),
            MessageKind::System,
            workflow_name,
        );
        pause(pacing.workflow_start_ms).await;

        let enabled = self.agent_manager.enabled();
        let last_index = enabled.len().saturating_sub(1);

        for (index, descriptor) in enabled.into_iter().enumerate() {
            set_current_agent(run, events_tx, Some(descriptor.id));
            log_to_run(
                run,
                events_tx,
                format!("--- {} Started ---", descriptor.name),
                MessageKind::System,
                &descriptor.name,
            );
            pause(pacing.agent_start_ms).await;

            self.execute_agent_step(run, input, descriptor, events_tx).await?;

            complete_agent(run, events_tx, descriptor.id);
            log_to_run(
                run,
                events_tx,
                format!("{} completed successfully", descriptor.name),
                MessageKind::Success,
                &descriptor.name,
            );
            pause(pacing.agent_complete_ms).await;

            if descriptor.checkpoint_after && !self.confirm(run, descriptor, events_tx).await? {
                log_to_run(
                    run,
                    events_tx,
                    "Workflow stopped by user",
                    MessageKind::Warning,
                    workflow_name,
                );
                abort_run(run, events_tx);
                tracing::info!(run_id = %run.id, agent_id = descriptor.id, "workflow stopped by user");
                return Ok(());
            }

            if index < last_index {
                set_current_agent(run, events_tx, None);
                pause(pacing.between_agents_ms).await;
            }
        }

        tracing::debug!(run_id = %run.id, "all agents walked, calling backend");
        let response = self.backend.run_all_agents(input).await?;
        self.record_results(run, response, events_tx);

        complete_run(run, events_tx);
        tracing::info!(run_id = %run.id, "workflow completed");
        Ok(())
    }

    /// Stream one agent's events into the session log.
    async fn execute_agent_step(
        &self,
        run: &mut WorkflowRun,
        input: &str,
        descriptor: &AgentDescriptor,
        events_tx: &UnboundedSender<Event>,
    ) -> WorkflowResult<()> {
        let context = ExecutionContext::new(input, descriptor.clone())
            .with_pacing(self.settings.pacing.clone());

        let mut stream = self.agent_manager.execute(&context).await?;

        while let Some(event) = stream.next().await {
            match event? {
                AgentEvent::Progress(line) => {
                    log_to_run(run, events_tx, line, MessageKind::Info, &descriptor.name);
                }
                AgentEvent::Completed => break,
            }
        }

        Ok(())
    }

    /// Suspend at the gate. Returns the decision.
    async fn confirm(
        &self,
        run: &mut WorkflowRun,
        descriptor: &AgentDescriptor,
        events_tx: &UnboundedSender<Event>,
    ) -> WorkflowResult<bool> {
        await_gate(run, events_tx);

        let wait = self
            .gate
            .open(descriptor.id, self.settings.checkpoint_prompt.clone())?;
        let request = wait.request().clone();
        let _ = events_tx.send(Event::GateOpened {
            run_id: run.id,
            request: request.clone(),
        });

        let proceed = wait.decision().await;
        let _ = events_tx.send(Event::GateResolved {
            run_id: run.id,
            gate_id: request.id,
            proceed,
        });

        if proceed {
            resume_run(run, events_tx);
        }
        Ok(proceed)
    }

    /// Store the backend result set and normalize each agent's payload.
    fn record_results(
        &self,
        run: &mut WorkflowRun,
        response: RunAgentsResponse,
        events_tx: &UnboundedSender<Event>,
    ) {
        let workflow_name = self.settings.workflow_name.as_str();
        let mut counts = Vec::new();

        for descriptor in self.agent_manager.descriptors() {
            let (Some(key), Some(field)) = (&descriptor.result_key, &descriptor.list_field) else {
                continue;
            };
            let Some(payload) = response.results.get(key) else {
                continue;
            };

            let normalized = normalize_value(payload, field);
            if !normalized.is_extracted() && payload.get("raw_response").is_some() {
                tracing::warn!(run_id = %run.id, key = %key, field = %field, "could not extract list from raw response");
                log_to_run(
                    run,
                    events_tx,
                    format!(
                        "{}: could not extract {field} from the response; raw output kept",
                        descriptor.name
                    ),
                    MessageKind::Warning,
                    workflow_name,
                );
            }
            counts.push(format!("{} {}", normalized.items(field).len(), field.replace('_', " ")));
            run.normalized.insert(key.clone(), normalized);
        }

        if !counts.is_empty() {
            log_to_run(
                run,
                events_tx,
                format!("Generated {}", counts.join(", ")),
                MessageKind::Info,
                workflow_name,
            );
        }

        let final_message = if response.excel_file().is_some() {
            "All agents completed successfully. Excel file generated."
        } else {
            "All agents completed successfully."
        };
        run.results = Some(response.results.into_iter().collect());
        log_to_run(run, events_tx, final_message, MessageKind::Success, workflow_name);
    }
}
