//! `appforge generate` — the full pipeline run.
//!
//! description → four generation stages → structured extraction →
//! materialization agent. Stage outputs are durably persisted under the
//! docs directory as they complete; the generated project lands under the
//! project directory.

use appforge_agent::{MaterializationAgent, SessionStore};
use appforge_config::GeneratorConfig;
use appforge_context::{ContextAssembler, PromptLibrary, escape_braces};
use appforge_core::error::Error;
use appforge_core::message::SessionId;
use appforge_core::schema::CodebaseTree;
use appforge_extract::Extractor;
use appforge_pipeline::{DocumentStore, StageChain};
use appforge_providers::build_provider;
use appforge_tools::registry_for;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The fixed reference documents every run loads.
const CONTEXT_RESOURCES: [&str; 4] = ["context", "basic_rules", "user_rules", "deprecated_code"];

pub async fn run(
    description: Option<String>,
    file: Option<PathBuf>,
    session: Option<String>,
) -> Result<(), Error> {
    let config = GeneratorConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })?;

    let description = match (description, file) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path).map_err(|e| Error::Config {
            message: format!("Failed to read description file {}: {e}", path.display()),
        })?,
        _ => {
            return Err(Error::Config {
                message: "Provide an app description, inline or with --file".into(),
            });
        }
    };

    let provider = build_provider(&config)?;

    // Fixed context: escaped reference documents plus the escaped target
    // schema, bound into stage templates at chain construction.
    let assembler = ContextAssembler::new(&config.paths.context_dir);
    let mut fixed: HashMap<String, String> = assembler.load_all(&CONTEXT_RESOURCES)?;
    let schema = serde_json::to_string_pretty(&CodebaseTree::json_schema())?;
    fixed.insert("codebase_schema".into(), escape_braces(&schema));

    let library = PromptLibrary::new(&config.paths.prompts_dir);
    let store = DocumentStore::new(&config.paths.docs_dir);

    let chain = StageChain::new(provider.clone(), &config.model, store)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_fixed_context(fixed)
        .stage(
            "structured_description",
            library.template("1_structured_description")?,
            "1_structured_description",
        )?
        .stage(
            "technical_description",
            library.template("2_technical_description")?,
            "2_technical_description",
        )?
        .stage("navigation", library.template("3_navigation")?, "3_navigation")?
        .stage("codebase", library.template("4_codebase")?, "4_codebase")?;

    info!("Running generation stages");
    let output = chain.run(&description).await?;

    info!("Extracting codebase tree");
    let extractor = Extractor::new(provider.clone(), &config.model)
        .with_repair_attempts(config.repair_attempts)
        .with_temperature(config.temperature);
    let tree = extractor.extract(output.final_output()).await?;

    // Overwrite the raw stage output with the validated pretty form.
    let store = DocumentStore::new(&config.paths.docs_dir);
    store.save("4_codebase", &serde_json::to_string_pretty(&tree)?)?;
    info!(files = tree.file_count(), "Codebase tree validated");

    let registry = Arc::new(registry_for(&config.paths.project_dir));
    let tools_description: String = registry
        .definitions()
        .iter()
        .map(|d| format!("{}: {}", d.name, d.description))
        .collect::<Vec<_>>()
        .join("\n");

    let mut system_values = HashMap::new();
    system_values.insert("codebase_schema".to_string(), schema);
    system_values.insert("tools".to_string(), tools_description);
    let system_prompt = library.template("system_prompt")?.render(&system_values)?;

    let sessions = Arc::new(SessionStore::new(&config.paths.sessions_dir));
    let agent = MaterializationAgent::new(
        provider,
        &config.model,
        registry,
        sessions,
        system_prompt,
    )
    .with_temperature(config.temperature)
    .with_max_tokens(config.max_tokens)
    .with_max_iterations(config.max_iterations)
    .with_retry_number(config.retry_number);

    let session_id = SessionId::from(session.as_deref().unwrap_or("default"));
    info!(session = %session_id, "Materializing codebase");
    let outcome = agent.run_tree(&session_id, &tree).await?;

    println!("\n✅ Generation complete");
    println!("   {}", outcome.summary);
    println!(
        "   {} iterations, {} tool calls",
        outcome.iterations, outcome.tool_calls_made
    );
    println!("   Project: {}", config.paths.project_dir.display());
    println!("   Stage documents: {}", config.paths.docs_dir.display());

    Ok(())
}
