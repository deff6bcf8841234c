mod args;
mod convert;
mod discovery;
mod json_output;
mod vue_sfc;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use oxc_allocator::Allocator;
use oxc_parser::Parser as OxcParser;
use oxc_span::SourceType;
use rayon::prelude::*;

use args::CliArgs;
use fieldcg::config::AnalysisConfig;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    run(&args).unwrap_or_else(|()| ExitCode::FAILURE)
}

fn run(args: &CliArgs) -> Result<ExitCode, ()> {
    let mut timer = Timer::new(args.time);

    let discovered = discovery::discover(&args.paths, &args.filter).map_err(|err| {
        eprintln!("error: invalid --filter pattern: {err}");
    })?;
    timer.lap("discover");

    if discovered.is_empty() {
        eprintln!("error: no source files matched the given paths/filters");
        return Ok(ExitCode::FAILURE);
    }

    // Read and parse in parallel, but keep the original discovery order when
    // feeding the results into `fieldcg::analyze`, so determinism does not
    // depend on how the file-level work got scheduled across threads.
    let mut cli_diagnostics: Vec<String> = Vec::new();
    let parsed: Vec<Option<(String, fieldcg::ast::Program)>> = discovered
        .par_iter()
        .map(|path| parse_one_file(path))
        .collect();
    timer.lap("parse");

    let mut files = Vec::with_capacity(parsed.len());
    let mut any_parse_failure = false;
    for (path, entry) in discovered.iter().zip(parsed) {
        match entry {
            Some((name, program)) => files.push((name, program)),
            None => {
                any_parse_failure = true;
                cli_diagnostics.push(format!("{}: failed to parse", path.display()));
            }
        }
    }

    if args.req_js && any_parse_failure {
        for diag in &cli_diagnostics {
            eprintln!("error: {diag}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let config = AnalysisConfig {
        strategy: args.strategy.into(),
        analyzer_type: args.analyzer_type.into(),
        count_callbacks: args.count_cb,
    };
    let (ctx, result) = fieldcg::analyze(files, config);
    timer.lap("analyze");

    for diag in &cli_diagnostics {
        eprintln!("warning: {diag}");
    }
    for diag in ctx.diagnostics.as_slice() {
        eprintln!("warning: {diag}");
    }

    let write_result = match &args.output {
        Some(path) => {
            let mut buf = Vec::new();
            emit(&mut buf, args, &result).map_err(|err| eprintln!("error: {err}"))?;
            fs::write(path, buf)
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            emit(&mut lock, args, &result)
        }
    };
    if let Err(err) = write_result {
        eprintln!("error writing output: {err}");
        return Ok(ExitCode::FAILURE);
    }
    timer.lap("output");
    timer.report();

    Ok(ExitCode::SUCCESS)
}

fn emit(out: &mut impl Write, args: &CliArgs, result: &fieldcg::ExtractionResult) -> io::Result<()> {
    if args.fg {
        json_output::write_acg_text(out, result)
    } else {
        json_output::write_json(out, result)
    }
}

fn parse_one_file(path: &std::path::Path) -> Option<(String, fieldcg::ast::Program)> {
    let raw = fs::read_to_string(path).ok()?;
    let name = path.to_string_lossy().into_owned();
    let is_vue = path.extension().and_then(|e| e.to_str()) == Some("vue");
    let (source, line_offset) = if is_vue {
        let (script, offset) = vue_sfc::extract_script(&raw)?;
        (script.to_owned(), offset)
    } else {
        (raw, 0)
    };

    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true).with_jsx(true);
    let parser_return = OxcParser::new(&allocator, &source, source_type).parse();
    if !parser_return.errors.is_empty() && parser_return.program.body.is_empty() {
        return None;
    }

    let mut diagnostics = Vec::new();
    let mut converter = convert::Converter::new(name.clone(), &source, line_offset, &mut diagnostics);
    let program = converter.convert_program(&parser_return.program);
    for diag in diagnostics {
        eprintln!("warning: {diag}");
    }
    Some((name, program))
}

/// Per-stage timing table, printed when `--time` is passed.
struct Timer {
    enabled: bool,
    start: Instant,
    laps: Vec<(&'static str, Instant)>,
}

impl Timer {
    fn new(enabled: bool) -> Self {
        Self { enabled, start: Instant::now(), laps: Vec::new() }
    }

    fn lap(&mut self, stage: &'static str) {
        if self.enabled {
            self.laps.push((stage, Instant::now()));
        }
    }

    fn report(&self) {
        if !self.enabled {
            return;
        }
        let mut previous = self.start;
        for (stage, at) in &self.laps {
            eprintln!("{stage}: {:?}", at.duration_since(previous));
            previous = *at;
        }
        eprintln!("total: {:?}", self.start.elapsed());
    }
}
