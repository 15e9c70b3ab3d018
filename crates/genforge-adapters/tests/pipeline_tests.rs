//! End-to-end pipeline runs over the in-memory adapters.

use std::path::Path;
use std::sync::Arc;

use genforge_adapters::{
    CannedEnhancer, MemoryFilesystem, ScriptedResponse, ScriptedRunner, builtin_constraints,
    builtin_templates,
};
use genforge_core::domain::{
    SuggestedFile, TemplateSuggestion, VALIDATIONS_FAILED, archetypes,
};
use genforge_core::prelude::*;

fn hello_profile() -> ProjectConstraints {
    ProjectConstraints::builder(Archetype::new("x").unwrap())
        .platform(Platform::Web)
        .build()
}

fn hello_service(
    rules: Vec<ValidationRule>,
    fs: MemoryFilesystem,
) -> GenerationService {
    let mut builder = GenerationTemplate::builder()
        .id(TemplateId::new("x-hello").unwrap())
        .name("Hello")
        .constraints(hello_profile())
        .file(TemplateFile::parameterized("index.txt", "hello {{name}}"));
    for rule in rules {
        builder = builder.rule(rule);
    }

    let mut templates = TemplateRegistry::new();
    templates.register(builder.build().unwrap()).unwrap();

    GenerationService::new(
        Arc::new(ConstraintRegistry::new()),
        Arc::new(templates),
        Box::new(fs),
        Box::new(ScriptedRunner::new()),
    )
}

fn hello_request() -> GenerationRequest {
    GenerationRequest::new(Archetype::new("x").unwrap(), "Demo", "/out")
        .platforms([Platform::Web])
}

fn catalog_service(fs: MemoryFilesystem, runner: ScriptedRunner) -> GenerationService {
    GenerationService::new(
        Arc::new(builtin_constraints::builtin_registry().unwrap()),
        Arc::new(builtin_templates::builtin_registry().unwrap()),
        Box::new(fs),
        Box::new(runner),
    )
}

#[test]
fn hello_scenario_succeeds() {
    let fs = MemoryFilesystem::new();
    let service = hello_service(
        vec![ValidationRule::file_exists("index exists", ["index.txt"])],
        fs.clone(),
    );

    let result = service
        .generate(hello_request(), &CancellationToken::new())
        .unwrap();

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(
        fs.read_file(Path::new("/out/Demo/index.txt")).as_deref(),
        Some("hello Demo")
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn missing_file_rule_fails_but_keeps_the_written_file() {
    let fs = MemoryFilesystem::new();
    let service = hello_service(
        vec![
            ValidationRule::file_exists("index exists", ["index.txt"]),
            ValidationRule::file_exists("missing exists", ["missing.txt"]),
        ],
        fs.clone(),
    );

    let result = service
        .generate(hello_request(), &CancellationToken::new())
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.state, PipelineState::Completed);
    assert!(fs.read_file(Path::new("/out/Demo/index.txt")).is_some());
    assert_eq!(
        result.validation_results.iter().filter(|r| !r.passed).count(),
        1
    );
    assert_eq!(result.warnings, vec![VALIDATIONS_FAILED]);
}

#[test]
fn chrome_extension_from_the_catalog() {
    let fs = MemoryFilesystem::new();
    let runner = ScriptedRunner::new();
    let service = catalog_service(fs.clone(), runner.clone());

    let request = GenerationRequest::new(
        Archetype::new(archetypes::CHROME_EXTENSION).unwrap(),
        "Tab Tamer",
        "/work",
    );
    let result = service.generate(request, &CancellationToken::new()).unwrap();

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.files_written.len(), 8);

    let manifest = fs
        .read_file(Path::new("/work/Tab Tamer/manifest.json"))
        .unwrap();
    assert!(manifest.contains("\"manifest_version\": 3"));
    assert!(manifest.contains("\"name\": \"Tab Tamer\""));

    // four template commands, then the build rule
    let commands = runner.commands();
    assert_eq!(commands.len(), 5);
    assert_eq!(commands[0], "npm init -y");
    assert_eq!(commands[4], "npm run build");
    assert!(
        result
            .next_steps
            .iter()
            .any(|s| s.contains("chrome://extensions"))
    );
}

#[test]
fn failing_build_is_reported_not_fatal() {
    let fs = MemoryFilesystem::new();
    let runner = ScriptedRunner::new().respond("npm run compile", ScriptedResponse::Exit(2));
    let service = catalog_service(fs.clone(), runner);

    let request = GenerationRequest::new(
        Archetype::new(archetypes::VSCODE_EXTENSION).unwrap(),
        "lint-lens",
        "/work",
    );
    let result = service.generate(request, &CancellationToken::new()).unwrap();

    assert!(!result.success);
    assert!(!result.is_fatal());
    assert_eq!(result.state, PipelineState::Completed);
    assert!(
        fs.read_file(Path::new("/work/lint-lens/src/extension.ts"))
            .unwrap()
            .contains("'lint-lens.hello'")
    );
    assert!(result.warnings.contains(&VALIDATIONS_FAILED.to_string()));
}

#[test]
fn archetype_without_template_is_fatal() {
    let fs = MemoryFilesystem::new();
    let service = catalog_service(fs.clone(), ScriptedRunner::new());

    let request = GenerationRequest::new(
        Archetype::new(archetypes::NEXTJS_WEB).unwrap(),
        "site",
        "/work",
    );
    let result = service.generate(request, &CancellationToken::new()).unwrap();

    assert!(result.is_fatal());
    assert_eq!(result.state, PipelineState::Failed);
    assert!(result.errors[0].contains("nextjs-web"));
    assert!(fs.list_files().is_empty());
}

#[test]
fn canned_enhancement_adds_a_file() {
    let fs = MemoryFilesystem::new();
    let enhancer = CannedEnhancer::new().with_template(TemplateSuggestion {
        files: vec![SuggestedFile::new("src/auth.ts", "export const auth = true\n")],
        ..Default::default()
    });
    let service = catalog_service(fs.clone(), ScriptedRunner::new())
        .with_enhancer(Box::new(enhancer.clone()));

    let request = GenerationRequest::new(
        Archetype::new(archetypes::DISCORD_BOT).unwrap(),
        "pinger",
        "/work",
    )
    .requirements("add authentication");
    let result = service.generate(request, &CancellationToken::new()).unwrap();

    assert!(result.success, "{:?}", result.errors);
    assert!(result.trail.contains(&PipelineState::Enhancing));
    assert_eq!(result.enhancements.len(), 1);
    assert_eq!(
        fs.read_file(Path::new("/work/pinger/src/auth.ts")).as_deref(),
        Some("export const auth = true\n")
    );
    assert_eq!(enhancer.calls().len(), 1);
}
