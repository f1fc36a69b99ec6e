use std::{
    fmt::Write as _,
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use toyc::{
    codegen, lexer, parser,
    scope::Scope,
    stdlib::JAVA,
    type_checker::Checker,
    util::{fmt::tree, intern::Interner},
    CompileError, CompileResult, Options,
};

/// Translates a toy program into Java source.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// The program to translate, or `-` to read standard input.
    input: PathBuf,

    /// Where to write the result. Defaults to standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to write.
    #[arg(long, value_enum, default_value_t = Emit::Java)]
    emit: Emit,

    /// Name of the generated class.
    #[arg(long, default_value = codegen::DEFAULT_CLASS_NAME, value_parser = class_name)]
    class_name: String,
}

#[derive(Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
enum Emit {
    /// The generated Java program.
    Java,
    /// The token stream.
    Tokens,
    /// The untyped syntax tree.
    Ast,
    /// The syntax tree annotated with types and call targets.
    Typed,
}

fn class_name(name: &str) -> Result<String, String> {
    if codegen::is_valid_class_name(name) {
        Ok(name.to_owned())
    } else {
        Err(format!("`{name}` is not a valid Java class name"))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let src = match read_input(&args) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("error: failed to read {}: {error}", args.input.display());
            return ExitCode::from(2);
        }
    };

    let out = match run(&args, &src) {
        Ok(out) => out,
        Err(error) => {
            let (line, column) = error.line_col(&src);
            let kind = error.kind();
            let message = error.message();
            eprintln!("error[{kind}]: {line}:{column}: {message}");
            return ExitCode::from(1);
        }
    };

    if let Err(error) = write_output(&args, &out) {
        eprintln!("error: failed to write output: {error}");
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}

fn run(args: &Args, src: &str) -> CompileResult<String> {
    if args.emit == Emit::Java {
        let options = Options {
            class_name: args.class_name.clone(),
        };
        return toyc::compile_with(src, &JAVA, &options);
    }

    let mut idents = Interner::with_capacity(128);
    let tokens = lexer::lex_in_new(src).map_err(|e| CompileError::lex(&e, &idents))?;
    if args.emit == Emit::Tokens {
        let mut out = String::new();
        for token in &tokens {
            let literal = token.literal(src);
            writeln!(out, "{:?} {} {literal:?}", token.kind, token.span())
                .expect("writing to a String can't fail");
        }
        return Ok(out);
    }

    let source = parser::parse_source(src, &tokens, &mut idents)
        .map_err(|e| CompileError::parse(&e, &idents))?;
    if args.emit == Emit::Ast {
        return Ok(tree::print_source_string(&idents, &source));
    }

    let source = Checker::new(&JAVA, &idents)
        .check(source, &mut Scope::root())
        .map_err(|e| CompileError::analysis(&e, &idents))?;
    Ok(tree::print_source_string(&idents, &source))
}

fn read_input(args: &Args) -> io::Result<String> {
    if args.input.as_os_str() == "-" {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        Ok(src)
    } else {
        fs::read_to_string(&args.input)
    }
}

fn write_output(args: &Args, out: &str) -> io::Result<()> {
    match &args.output {
        Some(path) => fs::write(path, out),
        None => io::stdout().write_all(out.as_bytes()),
    }
}
