//! End-to-end tests for binding generation.

use std::io::{self, Write};

use optionapi_codegen::{
    GenerateError, Generator, GeneratorConfig, RustGenerator, generate_to_string,
};
use optionapi_core::{CommandSchema, Document, OptionSchema, parse_str};

fn generate(document: &Document) -> String {
    generate_to_string(document, &GeneratorConfig::default()).unwrap()
}

fn generate_yaml(yaml: &str) -> String {
    generate(&parse_str(yaml).unwrap())
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in:\n{haystack}"))
}

/// Accepts `limit` bytes, then fails every write.
struct LimitedSink {
    data: Vec<u8>,
    limit: usize,
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.data.len();
        if room == 0 {
            return Err(io::Error::other("sink full"));
        }
        let n = room.min(buf.len());
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_empty_document() {
    let expected = r#"// Code generated by optionapi-gen. DO NOT EDIT.

pub mod cli_stub {
    use optionapi_runtime::CommandError;
    use optionapi_runtime::Context;

    pub trait Interface {
        fn hook_before(&self, ctx: &Context) -> Result<(), CommandError>;
        fn hook_after(&self, ctx: &Context, result: Result<(), CommandError>) -> Result<(), CommandError>;
    }

    /// Default [`Interface`]: hooks succeed and commands report `CommandError::Unimplemented`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Unimplemented;

    impl Interface for Unimplemented {
        fn hook_before(&self, _ctx: &Context) -> Result<(), CommandError> {
            Ok(())
        }

        fn hook_after(&self, _ctx: &Context, _result: Result<(), CommandError>) -> Result<(), CommandError> {
            Ok(())
        }
    }
}
"#;
    assert_eq!(generate(&Document::default()), expected);
}

#[test]
fn test_full_pipeline_output() {
    let yaml = r##"
optionapi:
  version: "1.0"
options:
  - name: verbose
    type: bool
    description: Print more output.
commands:
  version: {}
  server:
    description: Manage the server.
    options:
      - $ref: "#/components/options/port"
    commands:
      stop: {}
      start:
        usage: start the server
        maxArgs: 1
components:
  options:
    port:
      type: uint16
      default: 8080
      description: Port to listen on.
"##;

    let expected = r#"// Code generated by optionapi-gen. DO NOT EDIT.

pub mod cli_stub {
    use optionapi_runtime::CommandError;
    use optionapi_runtime::Context;

    pub trait Interface {
        fn hook_before(&self, ctx: &Context, opts: &AllCommandOptions) -> Result<(), CommandError>;
        fn hook_after(&self, ctx: &Context, opts: &AllCommandOptions, result: Result<(), CommandError>) -> Result<(), CommandError>;
        /// Manage the server.
        fn server_hook_before(&self, ctx: &Context, opts: &ServerOptions) -> Result<(), CommandError>;
        fn server_hook_after(&self, ctx: &Context, opts: &ServerOptions, result: Result<(), CommandError>) -> Result<(), CommandError>;
        /// start the server
        fn server_start(&self, ctx: &Context, opts: &ServerOptions) -> Result<(), CommandError>;
        fn server_stop(&self, ctx: &Context, opts: &ServerOptions) -> Result<(), CommandError>;
        fn version(&self, ctx: &Context, opts: &AllCommandOptions) -> Result<(), CommandError>;
    }

    #[derive(Debug, Clone)]
    pub struct AllCommandOptions {
        /// Print more output.
        pub verbose: Option<bool>,
    }

    #[derive(Debug, Clone)]
    pub struct ServerOptions {
        pub all_command: AllCommandOptions,
        /// Port to listen on.
        pub port: u16,
    }

    /// Default [`Interface`]: hooks succeed and commands report `CommandError::Unimplemented`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Unimplemented;

    impl Interface for Unimplemented {
        fn hook_before(&self, _ctx: &Context, _opts: &AllCommandOptions) -> Result<(), CommandError> {
            Ok(())
        }

        fn hook_after(&self, _ctx: &Context, _opts: &AllCommandOptions, _result: Result<(), CommandError>) -> Result<(), CommandError> {
            Ok(())
        }

        fn server_hook_before(&self, _ctx: &Context, _opts: &ServerOptions) -> Result<(), CommandError> {
            Ok(())
        }

        fn server_hook_after(&self, _ctx: &Context, _opts: &ServerOptions, _result: Result<(), CommandError>) -> Result<(), CommandError> {
            Ok(())
        }

        fn server_start(&self, _ctx: &Context, _opts: &ServerOptions) -> Result<(), CommandError> {
            Err(CommandError::Unimplemented)
        }

        fn server_stop(&self, _ctx: &Context, _opts: &ServerOptions) -> Result<(), CommandError> {
            Err(CommandError::Unimplemented)
        }

        fn version(&self, _ctx: &Context, _opts: &AllCommandOptions) -> Result<(), CommandError> {
            Err(CommandError::Unimplemented)
        }
    }
}
"#;
    assert_eq!(generate_yaml(yaml), expected);
}

#[test]
fn test_siblings_are_emitted_in_name_order() {
    let source = generate_yaml("commands:\n  foo: {}\n  bar: {}\n");
    assert!(position(&source, "fn bar(&self, ctx") < position(&source, "fn foo(&self, ctx"));
    assert!(position(&source, "fn bar(&self, _ctx") < position(&source, "fn foo(&self, _ctx"));

    let reordered = generate_yaml("commands:\n  bar: {}\n  foo: {}\n");
    assert_eq!(source, reordered);
}

#[test]
fn test_nested_records_chain_through_ancestors() {
    let mut doc = Document::default();
    doc.commands.insert(
        "db",
        CommandSchema::new()
            .with_option(OptionSchema::new("url", "string").required())
            .with_command(
                "migrate",
                CommandSchema::new()
                    .with_option(OptionSchema::new("steps", "int"))
                    .with_command("up", CommandSchema::new()),
            ),
    );

    let source = generate(&doc);
    assert!(source.contains(
        "    pub struct DbOptions {\n        pub url: String,\n    }\n"
    ));
    assert!(source.contains(
        "    pub struct DbMigrateOptions {\n        pub db: DbOptions,\n        pub steps: Option<i64>,\n    }\n"
    ));
    assert!(source.contains(
        "fn db_migrate_up(&self, ctx: &Context, opts: &DbMigrateOptions) -> Result<(), CommandError>;"
    ));
    assert!(!source.contains("AllCommandOptions"));
}

#[test]
fn test_ancestor_record_wins_over_global() {
    let yaml = r#"
options:
  - name: config
    type: string
commands:
  cache:
    options:
      - name: size
        type: uint64
        default: 1024
    commands:
      clear: {}
  ping: {}
"#;
    let source = generate_yaml(yaml);
    assert!(source.contains("fn cache_clear(&self, ctx: &Context, opts: &CacheOptions)"));
    assert!(source.contains("fn ping(&self, ctx: &Context, opts: &AllCommandOptions)"));
    assert!(source.contains("        pub all_command: AllCommandOptions,\n        pub size: u64,\n"));
}

#[test]
fn test_optionality_rule() {
    let mut doc = Document::default();
    doc.commands.insert(
        "run",
        CommandSchema::new()
            .with_option(OptionSchema::new("a", "int").required())
            .with_option(OptionSchema::new("b", "int").with_default("3"))
            .with_option(OptionSchema::new("c", "int")),
    );
    let source = generate(&doc);
    assert!(source.contains("pub a: i64,"));
    assert!(source.contains("pub b: i64,"));
    assert!(source.contains("pub c: Option<i64>,"));
}

#[test]
fn test_time_types_add_imports() {
    let yaml = r#"
options:
  - name: timeout
    type: duration
  - name: since
    type: time
    required: true
"#;
    let source = generate_yaml(yaml);
    assert!(source.contains(
        "    use optionapi_runtime::Context;\n    use std::time::Duration;\n    use std::time::SystemTime;\n\n"
    ));
    assert!(source.contains("pub timeout: Option<Duration>,"));
    assert!(source.contains("pub since: SystemTime,"));
}

#[test]
fn test_required_with_default_writes_nothing() {
    let mut doc = Document::default();
    doc.commands.insert(
        "run",
        CommandSchema::new().with_option(OptionSchema::new("n", "int").required().with_default("1")),
    );

    let mut out = Vec::new();
    let err = RustGenerator::default().generate(&doc, &mut out).unwrap_err();
    assert!(matches!(err, GenerateError::RequiredWithDefault { .. }));
    assert_eq!(
        err.to_string(),
        "option at \"run/n\" cannot have a default value and also be required"
    );
    assert!(out.is_empty());
}

#[test]
fn test_unsupported_type_names_tag() {
    let mut doc = Document::default();
    doc.options.push(OptionSchema::new("ratio", "decimal"));

    let err = generate_to_string(&doc, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "unsupported option type: \"decimal\"");
}

#[test]
fn test_config_overrides_names() {
    let mut doc = Document::default();
    doc.options.push(OptionSchema::new("debug", "bool"));
    let config = GeneratorConfig {
        module_name: Some("app".into()),
        trait_name: Some("Commands".into()),
        struct_name: Some("Noop".into()),
        global_options_name: Some("Global".into()),
        runtime_crate: Some("crate::runtime".into()),
        command_table: false,
    };

    let source = generate_to_string(&doc, &config).unwrap();
    assert!(source.contains("pub mod app {"));
    assert!(source.contains("use crate::runtime::Context;"));
    assert!(source.contains("pub trait Commands {"));
    assert!(source.contains("pub struct GlobalOptions {"));
    assert!(source.contains("impl Commands for Noop {"));
}

#[test]
fn test_command_table() {
    let yaml = r#"
commands:
  server:
    usage: server <command>
    commands:
      start:
        description: Start "now".
        minArgs: 1
        maxArgs: 2
"#;
    let config = GeneratorConfig {
        command_table: true,
        ..GeneratorConfig::default()
    };
    let source = generate_to_string(&parse_str(yaml).unwrap(), &config).unwrap();

    let expected_start = r#"        CommandEntry {
            path: &["server", "start"],
            identifier: "ServerStart",
            method: Some("server_start"),
            options: None,
            usage: None,
            description: Some("Start \"now\"."),
            min_args: 1,
            max_args: 2,
            has_sub_commands: false,
        },
"#;
    assert!(source.contains("    pub const COMMANDS: &[CommandEntry] = &[\n"));
    assert!(source.contains(expected_start));
    assert!(source.contains("            method: None,\n            options: None,\n            usage: Some(\"server <command>\"),"));
    assert!(position(&source, "path: &[\"server\"]") < position(&source, "path: &[\"server\", \"start\"]"));
}

#[test]
fn test_empty_command_table() {
    let config = GeneratorConfig {
        command_table: true,
        ..GeneratorConfig::default()
    };
    let source = generate_to_string(&Document::default(), &config).unwrap();
    assert!(source.ends_with("    pub const COMMANDS: &[CommandEntry] = &[];\n}\n"));
}

#[test]
fn test_record_names_do_not_clash_with_entry_type() {
    let mut doc = Document::default();
    doc.commands.insert(
        "command",
        CommandSchema::new()
            .with_option(OptionSchema::new("x", "int"))
            .with_command("entry", CommandSchema::new().with_option(OptionSchema::new("y", "int"))),
    );
    let config = GeneratorConfig {
        command_table: true,
        ..GeneratorConfig::default()
    };
    assert!(generate_to_string(&doc, &config).is_ok());
}

#[test]
fn test_write_failure_keeps_partial_output() {
    let mut doc = Document::default();
    doc.commands.insert("status", CommandSchema::new());
    let full = generate(&doc);

    let mut sink = LimitedSink {
        data: Vec::new(),
        limit: 100,
    };
    let err = RustGenerator::default().generate(&doc, &mut sink).unwrap_err();
    assert!(matches!(err, GenerateError::Io(_)));
    assert_eq!(sink.data, full.as_bytes()[..100]);
}

#[test]
fn test_byte_count_matches_output() {
    let mut doc = Document::default();
    doc.options.push(OptionSchema::new("verbose", "bool").with_description("Louder."));
    doc.commands.insert("run", CommandSchema::new());

    let mut out = Vec::new();
    let written = RustGenerator::default().generate(&doc, &mut out).unwrap();
    assert_eq!(written, out.len());
}

#[test]
fn test_undefined_reference_stops_before_generation() {
    let yaml = r##"
commands:
  run:
    options:
      - $ref: "#/components/options/missing"
"##;
    let err = parse_str(yaml).unwrap_err();
    assert_eq!(
        err.to_string(),
        "undefined reference: '#/components/options/missing'"
    );
}

#[test]
fn test_one_letter_and_acronym_paths() {
    let yaml = r#"
commands:
  ab: {}
  a:
    commands:
      b: {}
  API:
    options:
      - name: token
        type: string
    commands:
      v2:
        options:
          - name: region
            type: string
"#;
    let source = generate_yaml(yaml);
    assert!(source.contains("fn ab(&self, ctx: &Context) -> Result<(), CommandError>;"));
    assert!(source.contains("fn a_hook_before(&self, ctx: &Context) -> Result<(), CommandError>;"));
    assert!(source.contains("fn a_b(&self, ctx: &Context) -> Result<(), CommandError>;"));
    assert!(source.contains(
        "    pub struct APIV2Options {\n        pub api: APIOptions,\n        pub region: Option<String>,\n    }\n"
    ));
    assert!(source.contains("fn api_v2(&self, ctx: &Context, opts: &APIV2Options)"));
}

#[test]
fn test_sibling_with_same_identifier_is_not_an_ancestor() {
    let yaml = r#"
commands:
  a:
    commands:
      BC:
        options:
          - name: sibling
            type: bool
        commands:
          x: {}
      b:
        commands:
          c:
            commands:
              d: {}
"#;
    let source = generate_yaml(yaml);
    assert!(source.contains("fn a_bc_x(&self, ctx: &Context, opts: &ABCOptions)"));
    assert!(source.contains("fn a_b_c_d(&self, ctx: &Context) -> Result<(), CommandError>;"));
    assert!(!source.contains("fn a_b_c_d(&self, ctx: &Context, opts"));
}

#[test]
fn test_keyword_and_digit_command_names_are_escaped() {
    let yaml = r#"
commands:
  move: {}
  type: {}
  2fa:
    options:
      - name: code
        type: string
    commands:
      ref: {}
"#;
    let source = generate_yaml(yaml);
    assert!(source.contains("fn r#move(&self, ctx: &Context) -> Result<(), CommandError>;"));
    assert!(source.contains("fn r#type(&self, _ctx: &Context) -> Result<(), CommandError> {"));
    assert!(source.contains("pub struct _2faOptions {"));
    assert!(source.contains("fn _2fa_hook_before(&self, ctx: &Context, opts: &_2faOptions)"));
    assert!(source.contains("fn _2fa_ref(&self, ctx: &Context, opts: &_2faOptions)"));
    assert!(!source.contains("fn move("));
    assert!(!source.contains(" 2fa"));
}
