//! Generation Service - main application orchestrator.
//!
//! Drives one run through the pipeline:
//! 1. Validate constraints
//! 2. Select the template
//! 3. Build the context
//! 4. Enhance (optional)
//! 5. Materialize files
//! 6. Execute commands
//! 7. Validate the result
//! 8. Post-enhance (optional)
//!
//! Only steps 1 and 2 (and cancellation) can fail a run. Everything after
//! that is best effort and reported per item in the [`GenerationResult`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, CancellationToken,
        ports::{CommandRunner, Enhancer, Filesystem},
        registry::{ConstraintRegistry, TemplateRegistry},
        services::rule_evaluator::RuleEvaluator,
    },
    domain::{
        Archetype, CommandOutcome, CommandReport, ConstraintOverride, ConstraintReport,
        DomainError, DomainValidator, FileReport, GenerationContext, GenerationMetadata,
        GenerationResult, GenerationTemplate, PipelineState, Platform, ProjectConstraints,
        RelativePath, RunTracker, TaskOutcome, TaskReport, TemplateFile, TemplateId,
        VALIDATIONS_FAILED, Variable, rules,
    },
    error::GenforgeResult,
};

/// Improvement tasks run during post-enhancement, in order.
pub const POST_ENHANCEMENT_TASKS: [&str; 5] = [
    "Add comprehensive error handling",
    "Implement proper logging",
    "Add input validation",
    "Create unit tests",
    "Add documentation",
];

/// Source name recorded for the requirements-driven enhancement merge.
pub const REQUIREMENTS_SOURCE: &str = "requirements";

// ── Request / options ────────────────────────────────────────────────────────

/// What to generate.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub archetype: Archetype,
    /// When non-empty, replaces the profile's platform set.
    pub platforms: Vec<Platform>,
    pub custom_requirements: Option<String>,
    /// Stored trimmed.
    pub project_name: String,
    /// The project is written to `output_dir/project_name`.
    pub output_dir: PathBuf,
    pub constraint_override: ConstraintOverride,
    pub variables: BTreeMap<String, Variable>,
}

impl GenerationRequest {
    pub fn new(
        archetype: Archetype,
        project_name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let project_name: String = project_name.into();
        Self {
            archetype,
            platforms: Vec::new(),
            custom_requirements: None,
            project_name: project_name.trim().to_string(),
            output_dir: output_dir.into(),
            constraint_override: ConstraintOverride::default(),
            variables: BTreeMap::new(),
        }
    }

    pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn requirements(mut self, text: impl Into<String>) -> Self {
        self.custom_requirements = Some(text.into());
        self
    }

    pub fn constraint_override(mut self, over: ConstraintOverride) -> Self {
        self.constraint_override = over;
        self
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn project_path(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }

    fn requirements_text(&self) -> Option<&str> {
        self.custom_requirements
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Upper bound on concurrent file writes. `1` writes sequentially.
    pub write_workers: usize,
    /// Run the post-enhancement tasks after validation.
    pub post_enhance: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            write_workers: std::thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4),
            post_enhance: false,
        }
    }
}

/// What a run would do, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPlan {
    pub project_path: PathBuf,
    pub template_id: TemplateId,
    pub template_name: String,
    pub constraints: ProjectConstraints,
    pub report: ConstraintReport,
    pub files: Vec<String>,
    pub commands: Vec<String>,
    pub rules: Vec<String>,
}

// ── Service ──────────────────────────────────────────────────────────────────

/// Main generation service.
pub struct GenerationService {
    constraints: Arc<ConstraintRegistry>,
    templates: Arc<TemplateRegistry>,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    enhancer: Option<Box<dyn Enhancer>>,
    options: GenerationOptions,
    /// Built on first use; `None` means sequential writes.
    pool: OnceLock<Option<ThreadPool>>,
}

/// One file ready to write.
struct WriteJob {
    path: RelativePath,
    target: PathBuf,
    content: String,
    executable: bool,
}

impl GenerationService {
    pub fn new(
        constraints: Arc<ConstraintRegistry>,
        templates: Arc<TemplateRegistry>,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            constraints,
            templates,
            filesystem,
            runner,
            enhancer: None,
            options: GenerationOptions::default(),
            pool: OnceLock::new(),
        }
    }

    pub fn with_enhancer(mut self, enhancer: Box<dyn Enhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self.pool = OnceLock::new();
        self
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Run the full pipeline.
    ///
    /// Fatal problems (invalid constraints, no template, cancellation) are
    /// reported in `errors` of an `Ok` result. `Err` is reserved for
    /// internal faults such as an illegal state transition.
    #[instrument(
        skip_all,
        fields(
            archetype = %request.archetype,
            project = %request.project_name,
            output = %request.output_dir.display()
        )
    )]
    pub fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenforgeResult<GenerationResult> {
        let metadata = GenerationMetadata::fresh();
        let project_path = request.project_path();
        info!(run_id = %metadata.run_id, "Starting generation");

        let mut run = RunTracker::new();
        let mut result = GenerationResult::new(metadata.run_id, project_path.clone());

        self.run_pipeline(&request, metadata, project_path, cancel, &mut run, &mut result)?;

        result.state = run.state();
        result.trail = run.trail().to_vec();

        info!(
            success = result.success,
            state = %result.state,
            files = result.files_written.len(),
            commands = result.commands_executed.len(),
            "Generation finished"
        );
        Ok(result)
    }

    /// Resolve constraints and template and list what a run would touch.
    pub fn plan(&self, request: &GenerationRequest) -> GenforgeResult<GenerationPlan> {
        let constraints = self.resolve_constraints(request);
        let report = constraints.validate();
        let template = self
            .templates
            .select(&request.archetype)
            .ok_or_else(|| DomainError::NoTemplateForArchetype(request.archetype.to_string()))?;

        let ctx = self.build_context(request, request.project_path(), constraints, template, GenerationMetadata::fresh());

        Ok(GenerationPlan {
            project_path: ctx.project_path().to_path_buf(),
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            constraints: ctx.constraints().clone(),
            report,
            files: template.files.iter().map(|f| f.path.to_string()).collect(),
            commands: template
                .commands
                .iter()
                .map(|c| ctx.interpolate(&c.command))
                .collect(),
            rules: template
                .validation
                .iter()
                .map(|r| format!("{}: {}", r.kind(), r.description))
                .collect(),
        })
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    fn run_pipeline(
        &self,
        request: &GenerationRequest,
        metadata: GenerationMetadata,
        project_path: PathBuf,
        cancel: &CancellationToken,
        run: &mut RunTracker,
        result: &mut GenerationResult,
    ) -> GenforgeResult<()> {
        // 1. Validate constraints
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::Validating)?;

        let constraints = self.resolve_constraints(request);
        let mut errors = self.constraints.validate(&constraints).errors;
        if let Err(e) = DomainValidator::validate_project_name(&request.project_name) {
            errors.push(e);
        }
        if !errors.is_empty() {
            warn!(?errors, "Constraint validation failed");
            result.errors = errors;
            run.advance(PipelineState::Failed)?;
            return Ok(());
        }

        // 2. Select template
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::TemplateSelected)?;

        let Some(template) = self.templates.select(&request.archetype) else {
            let err = DomainError::NoTemplateForArchetype(request.archetype.to_string());
            warn!(%err, "Template selection failed");
            result.errors.push(err.to_string());
            run.advance(PipelineState::Failed)?;
            return Ok(());
        };
        info!(template = %template.id, "Template selected");

        // 3. Build context
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::ContextBuilt)?;
        let mut ctx = self.build_context(request, project_path, constraints, template, metadata);

        // 4. Enhance (optional, non-fatal)
        if let (Some(enhancer), Some(requirements)) = (&self.enhancer, request.requirements_text()) {
            if self.interrupted(cancel, run, result) {
                return Ok(());
            }
            run.advance(PipelineState::Enhancing)?;
            self.enhance(enhancer.as_ref(), &mut ctx, requirements);
        }

        // 5. Materialize
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::Materializing)?;
        for report in self.materialize(&ctx, &ctx.template().files) {
            result.record_file(report);
        }
        info!(
            written = result.files_written.len(),
            skipped = result.skipped_files().count(),
            "Files materialized"
        );

        // 6. Execute commands
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::CommandExecuting)?;
        if !self.execute_commands(&ctx, cancel, result) {
            run.cancel();
            return Ok(());
        }

        // 7. Validate
        if self.interrupted(cancel, run, result) {
            return Ok(());
        }
        run.advance(PipelineState::Validated)?;
        let evaluator = RuleEvaluator::new(self.filesystem.as_ref(), self.runner.as_ref());
        result.validation_results = evaluator.evaluate_all(&ctx.template().validation, &ctx);
        let all_passed = result.validation_results.iter().all(|r| r.passed);

        // 8. Post-enhance (optional, non-fatal)
        if self.options.post_enhance
            && let Some(enhancer) = &self.enhancer
        {
            if self.interrupted(cancel, run, result) {
                return Ok(());
            }
            run.advance(PipelineState::PostEnhancing)?;
            self.post_enhance(enhancer.as_ref(), &mut ctx, result);
        }

        // 9. Complete
        run.advance(PipelineState::Completed)?;
        result.success = all_passed;
        if !all_passed {
            result.warnings.push(VALIDATIONS_FAILED.to_string());
        }
        result.enhancements = ctx.merges().to_vec();
        result.next_steps = rules::next_steps(ctx.project_name(), ctx.constraints());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Profile for the archetype (or a bare one), with request overrides applied.
    fn resolve_constraints(&self, request: &GenerationRequest) -> ProjectConstraints {
        let base = self.constraints.get(&request.archetype).unwrap_or_else(|| {
            debug!(archetype = %request.archetype, "No constraint profile, starting bare");
            ProjectConstraints::builder(request.archetype.clone()).build()
        });

        let mut over = request.constraint_override.clone();
        if !request.platforms.is_empty() {
            over.platforms = Some(request.platforms.iter().copied().collect());
        }
        self.constraints.merge(&base, &over)
    }

    fn build_context(
        &self,
        request: &GenerationRequest,
        project_path: PathBuf,
        constraints: ProjectConstraints,
        template: &GenerationTemplate,
        metadata: GenerationMetadata,
    ) -> GenerationContext {
        GenerationContext::new(
            request.project_name.clone(),
            project_path,
            constraints,
            template.clone(),
        )
        .with_variables(request.variables.clone())
        .with_metadata(metadata)
    }

    /// Record cancellation and move to `Failed`. Returns true if cancelled.
    fn interrupted(
        &self,
        cancel: &CancellationToken,
        run: &mut RunTracker,
        result: &mut GenerationResult,
    ) -> bool {
        if !cancel.is_cancelled() {
            return false;
        }
        warn!(state = %run.state(), "Run cancelled");
        run.cancel();
        result.errors.push(ApplicationError::Cancelled.to_string());
        true
    }

    fn enhance(
        &self,
        enhancer: &dyn Enhancer,
        ctx: &mut GenerationContext,
        requirements: &str,
    ) {
        match enhancer.enhance_template(ctx, requirements) {
            Ok(suggestion) => {
                let record = ctx.merge_suggestion(REQUIREMENTS_SOURCE, suggestion);
                if !record.rejected.is_empty() {
                    warn!(rejected = ?record.rejected, "Discarded suggested paths outside the project");
                }
                info!(
                    files = record.files,
                    dependencies = record.dependencies,
                    commands = record.commands,
                    "Template enhanced"
                );
            }
            Err(e) => {
                warn!(error = %e, "Enhancement failed, continuing with base template");
            }
        }
    }

    fn post_enhance(
        &self,
        enhancer: &dyn Enhancer,
        ctx: &mut GenerationContext,
        result: &mut GenerationResult,
    ) {
        for task in POST_ENHANCEMENT_TASKS {
            let outcome = match enhancer.enhance_with_task(ctx, task) {
                Ok(suggestion) => {
                    let (record, files) = ctx.merge_task(task, suggestion);
                    if !record.rejected.is_empty() {
                        warn!(task, rejected = ?record.rejected, "Discarded suggested paths outside the project");
                    }
                    let reports = self.materialize(ctx, &files);
                    let written = reports.iter().filter(|r| r.is_written()).count();
                    for report in reports {
                        result.record_file(report);
                    }
                    TaskOutcome::Applied { files: written }
                }
                Err(e) => {
                    warn!(task, error = %e, "Post-enhancement task failed");
                    TaskOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            result.post_tasks.push(TaskReport {
                task: task.to_string(),
                outcome,
            });
        }
    }

    /// Write `files` under the project root.
    ///
    /// Content is resolved and directories are created up front; the writes
    /// themselves go to a bounded worker pool. Duplicate paths are written
    /// sequentially so the last declaration wins.
    fn materialize(&self, ctx: &GenerationContext, files: &[TemplateFile]) -> Vec<FileReport> {
        let root = ctx.project_path();
        let mut reports: Vec<Option<FileReport>> = vec![None; files.len()];
        let mut jobs: Vec<(usize, WriteJob)> = Vec::with_capacity(files.len());

        for (i, file) in files.iter().enumerate() {
            let target = file.path.under(root);
            if !file.overwrite && self.filesystem.exists(&target) {
                debug!(path = %file.path, "Keeping existing file");
                reports[i] = Some(FileReport::skipped(
                    file.path.clone(),
                    "file exists and overwrite is disabled",
                ));
                continue;
            }
            jobs.push((
                i,
                WriteJob {
                    path: file.path.clone(),
                    target,
                    content: file.content.resolve(ctx),
                    executable: file.executable,
                },
            ));
        }

        // Parent directories first, each once.
        let mut dir_errors: HashMap<PathBuf, String> = HashMap::new();
        let dirs: BTreeSet<PathBuf> = std::iter::once(root.to_path_buf())
            .chain(
                jobs.iter()
                    .filter_map(|(_, j)| j.target.parent().map(Path::to_path_buf)),
            )
            .collect();
        for dir in dirs {
            if let Err(e) = self.filesystem.create_dir_all(&dir) {
                warn!(dir = %dir.display(), error = %e, "Failed to create directory");
                dir_errors.insert(dir, e.to_string());
            }
        }

        let (blocked, ready): (Vec<_>, Vec<_>) = jobs.into_iter().partition(|(_, j)| {
            j.target
                .parent()
                .is_some_and(|p| dir_errors.contains_key(p))
        });
        for (i, job) in blocked {
            let reason = job
                .target
                .parent()
                .and_then(|p| dir_errors.get(p))
                .cloned()
                .unwrap_or_default();
            reports[i] = Some(FileReport::skipped(job.path, reason));
        }

        let duplicates = {
            let mut seen = BTreeSet::new();
            ready.iter().any(|(_, j)| !seen.insert(&j.path))
        };

        if duplicates {
            debug!("Duplicate paths present, writing sequentially");
        }
        let written: Vec<(usize, FileReport)> = match self.write_pool() {
            Some(pool) if !duplicates => pool.install(|| {
                ready
                    .par_iter()
                    .map(|(i, j)| (*i, self.write_one(j)))
                    .collect()
            }),
            _ => ready.iter().map(|(i, j)| (*i, self.write_one(j))).collect(),
        };

        for (i, report) in written {
            reports[i] = Some(report);
        }
        reports.into_iter().flatten().collect()
    }

    /// The shared write pool, or `None` for sequential writes.
    fn write_pool(&self) -> Option<&ThreadPool> {
        self.pool
            .get_or_init(|| {
                let workers = self.options.write_workers;
                if workers <= 1 {
                    return None;
                }
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("genforge-write-{i}"))
                    .build()
                    .inspect_err(|e| warn!(error = %e, "Write pool unavailable, writing sequentially"))
                    .ok()
            })
            .as_ref()
    }

    fn write_one(&self, job: &WriteJob) -> FileReport {
        let written = self
            .filesystem
            .write_file(&job.target, &job.content)
            .and_then(|()| {
                if job.executable {
                    self.filesystem.set_executable(&job.target)
                } else {
                    Ok(())
                }
            });

        match written {
            Ok(()) => {
                debug!(path = %job.path, "Wrote file");
                FileReport::written(job.path.clone())
            }
            Err(e) => {
                warn!(path = %job.path, error = %e, "Failed to write file");
                FileReport::skipped(job.path.clone(), e.to_string())
            }
        }
    }

    /// Run template commands in order. Returns false if cancelled midway.
    fn execute_commands(
        &self,
        ctx: &GenerationContext,
        cancel: &CancellationToken,
        result: &mut GenerationResult,
    ) -> bool {
        for cmd in &ctx.template().commands {
            if cancel.is_cancelled() {
                warn!("Run cancelled between commands");
                result.errors.push(ApplicationError::Cancelled.to_string());
                return false;
            }

            let command = ctx.interpolate(&cmd.command);
            let cwd = match &cmd.working_directory {
                Some(dir) => dir.under(ctx.project_path()),
                None => ctx.project_path().to_path_buf(),
            };
            info!(%command, cwd = %cwd.display(), "Executing command");

            let outcome = match self.runner.run(&command, &cwd) {
                Ok(out) => {
                    if !out.success() {
                        warn!(%command, exit_code = out.exit_code, stderr = %out.stderr.trim(), "Command exited non-zero");
                    }
                    CommandOutcome::Executed {
                        exit_code: out.exit_code,
                    }
                }
                Err(e) => {
                    warn!(%command, error = %e, "Command failed to start");
                    CommandOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            result.record_command(CommandReport { command, outcome });
        }
        true
    }
}
