//! `appforge init` — write default configuration, prompt templates, and
//! context stubs. Existing files are never overwritten.

use appforge_config::GeneratorConfig;
use appforge_core::error::Error;
use std::path::Path;

const STAGE_1_PROMPT: &str = "\
You are a senior product analyst.

Project background and constraints:
{context}

App description:
{description}

Produce a structured description of the application: its purpose, the list
of screens, the data it manages, and the user-visible features. Use short
numbered sections. Do not write any code.
";

const STAGE_2_PROMPT: &str = "\
You are a senior software architect.

Project background and constraints:
{context}

App description:
{description}

Structured description:
{structured_description}

Produce a technical description of the application: the architecture,
modules, data models, state management, and how the features map onto
components. Use short numbered sections. Do not write any code.
";

const STAGE_3_PROMPT: &str = "\
You are a senior software architect.

Project background and constraints:
{context}

App description:
{description}

Structured description:
{structured_description}

Technical description:
{technical_description}

Describe the navigation of the application: every screen, how the user
moves between screens, and which component owns each transition. Do not
write any code.
";

const STAGE_4_PROMPT: &str = "\
You are a senior software engineer generating a complete codebase.

Project background and constraints:
{context}

Coding rules:
{basic_rules}

Additional user rules:
{user_rules}

Deprecated APIs that must not be used:
{deprecated_code}

App description:
{description}

Structured description:
{structured_description}

Technical description:
{technical_description}

Navigation:
{navigation}

Generate the full folder and file structure of the application, with the
complete source text of every file. Respond with ONLY a JSON object
conforming to this schema:
{codebase_schema}
";

const SYSTEM_PROMPT: &str = "\
You are a file-system agent that materializes a codebase onto disk.

The user message contains a JSON object describing a tree of folders and
files, conforming to this schema:
{codebase_schema}

You have these tools:
{tools}

Walk the tree and create every folder and every file with its exact
content. Invoke exactly one tool per step. All paths are relative to the
project root. When every file has been written, verify the result with
list_directory and then reply with a short summary of what was created.
";

const CONTEXT_STUB: &str = "\
Describe here the fixed project background every generation stage should
know about: target platform, frameworks, conventions.
";

const BASIC_RULES_STUB: &str = "\
List here the coding rules the generated code must follow.
";

const USER_RULES_STUB: &str = "\
List here any additional rules of your own.
";

const DEPRECATED_CODE_STUB: &str = "\
List here deprecated APIs the generated code must avoid.
";

pub fn run() -> Result<(), Error> {
    let config = GeneratorConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    let config_dir = GeneratorConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("appforge — setup");
    println!("================\n");

    create_dir(&config_dir)?;

    if config_path.exists() {
        println!("  Config exists: {}", config_path.display());
    } else {
        write_new(&config_path, &GeneratorConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    let prompts = &config.paths.prompts_dir;
    create_dir(prompts)?;
    write_if_absent(&prompts.join("1_structured_description.txt"), STAGE_1_PROMPT)?;
    write_if_absent(&prompts.join("2_technical_description.txt"), STAGE_2_PROMPT)?;
    write_if_absent(&prompts.join("3_navigation.txt"), STAGE_3_PROMPT)?;
    write_if_absent(&prompts.join("4_codebase.txt"), STAGE_4_PROMPT)?;
    write_if_absent(&prompts.join("system_prompt.txt"), SYSTEM_PROMPT)?;
    println!("✅ Prompt templates ready: {}", prompts.display());

    let context = &config.paths.context_dir;
    create_dir(context)?;
    write_if_absent(&context.join("context.txt"), CONTEXT_STUB)?;
    write_if_absent(&context.join("basic_rules.txt"), BASIC_RULES_STUB)?;
    write_if_absent(&context.join("user_rules.txt"), USER_RULES_STUB)?;
    write_if_absent(&context.join("deprecated_code.txt"), DEPRECATED_CODE_STUB)?;
    println!("✅ Context stubs ready: {}", context.display());

    println!("\n📝 Next steps:");
    println!("  1. Set your API key: export APPFORGE_API_KEY=sk-...");
    println!("  2. Edit the context files under {}", context.display());
    println!("  3. Run: appforge generate \"describe your app\"");

    Ok(())
}

fn create_dir(path: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(path).map_err(|e| Error::Config {
        message: format!("Failed to create {}: {e}", path.display()),
    })
}

fn write_new(path: &Path, content: &str) -> Result<(), Error> {
    std::fs::write(path, content).map_err(|e| Error::Config {
        message: format!("Failed to write {}: {e}", path.display()),
    })
}

fn write_if_absent(path: &Path, content: &str) -> Result<(), Error> {
    if path.exists() {
        return Ok(());
    }
    write_new(path, content)
}
