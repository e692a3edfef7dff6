use std::{fs, path::Path, process::ExitCode};

use clap::{Arg, ArgAction, Command};
use ingot_codegen::{Transformer, TransformerConfig, TransformOptions, TypeKnowledge};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = Command::new("ingot")
        .arg(
            Arg::new("file")
                .help("the IL JSON file to transform")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("the file path where the generated Go source should be written"),
        )
        .arg(
            Arg::new("package")
                .short('p')
                .long("package")
                .help("output package name (overrides the options document)"),
        )
        .arg(
            Arg::new("options")
                .long("options")
                .help("JSON document with transformer options"),
        )
        .arg(
            Arg::new("type-knowledge")
                .long("type-knowledge")
                .help("JSON document with OpCodes return-type knowledge"),
        )
        .arg(
            Arg::new("no-comments")
                .long("no-comments")
                .help("do not emit doc comments on generated declarations")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("loose-types")
                .long("loose-types")
                .help("prefer interface{} over concrete types")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-generics")
                .long("no-generics")
                .help("spell the empty interface interface{} instead of any")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("error-handling")
                .long("error-handling")
                .help("append an error return to generated constructors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("use-context")
                .long("use-context")
                .help("prepend a context parameter to free functions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-crypto")
                .long("no-crypto")
                .help("avoid standard-library crypto helpers")
                .action(ArgAction::SetTrue),
        );

    let matches = cmd.get_matches();
    let file = matches.get_one::<String>("file").expect("file is required");

    let mut options = match matches.get_one::<String>("options") {
        Some(path) => match load_options(path) {
            Ok(options) => options,
            Err(err) => {
                eprintln!("unable to load options: {err:#}");
                return ExitCode::FAILURE;
            }
        },
        None => TransformOptions::default(),
    };
    if let Some(package) = matches.get_one::<String>("package") {
        options.package_name = package.clone();
    }
    if matches.get_flag("no-comments") {
        options.add_comments = false;
    }
    if matches.get_flag("loose-types") {
        options.use_strict_types = false;
    }
    if matches.get_flag("no-generics") {
        options.use_generics = false;
    }
    if matches.get_flag("error-handling") {
        options.error_handling = true;
    }
    if matches.get_flag("use-context") {
        options.use_context = true;
    }
    if matches.get_flag("no-crypto") {
        options.use_crypto = false;
    }

    let type_knowledge = match matches.get_one::<String>("type-knowledge") {
        Some(path) => match load_type_knowledge(path) {
            Ok(knowledge) => knowledge,
            Err(err) => {
                eprintln!("unable to load type knowledge: {err:#}");
                return ExitCode::FAILURE;
            }
        },
        None => TypeKnowledge::default(),
    };

    let program = match ingot_il::parse_file(Path::new(file)) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("unable to parse IL: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut transformer = Transformer::new(TransformerConfig {
        options,
        type_knowledge,
    });
    let go_file = transformer.transform(&program);
    for warning in transformer.warnings() {
        eprintln!("warning: {warning}");
    }

    let source = match go_file.render() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("unable to render Go source: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match matches.get_one::<String>("output") {
        Some(output) => match fs::write(output, source) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => {
                eprintln!("failed to create file: {output}");
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{source}");
            ExitCode::SUCCESS
        }
    }
}

fn load_options(path: &str) -> anyhow::Result<TransformOptions> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_type_knowledge(path: &str) -> anyhow::Result<TypeKnowledge> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
