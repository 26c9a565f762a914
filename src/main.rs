use std::{fs, io::BufRead, process};

use cfg_table_helper::{
    grammar::symbol::symbols_of, Analysis, Grammar, Output, OutputFormat, Recognizer,
};
use log::warn;

const OUTPUTS: [&str; 6] = ["prod", "ff", "ll1", "lr0fsm", "slr1table", "verdict"];

fn print_help() {
    println!("Usage: cfg-table-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions (indexed)");
    println!("  ff: Nullable, first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("  lr0fsm: LR(0) Automata");
    println!("  slr1table: SLR(1) parsing table");
    println!("  verdict: Whether the grammar is LL(1) and SLR(1)");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -p ll1|slr1|auto <strings file>: Parse every line of the file");
    println!("  -t: Print a parse trace for every parsed line");
    println!("The grammar is read from stdin when no file is given.");
    println!("Set RUST_LOG=debug to see how the tables are built.");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn print_verdict(a: &Analysis, output_format: OutputFormat) {
    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    match output_format {
        OutputFormat::JSON => println!(
            "{}",
            serde_json::json!({ "is_ll1": a.is_ll1(), "is_slr1": a.is_slr1() })
        ),
        _ => {
            println!("Grammar is LL(1): {}", yes_no(a.is_ll1()));
            println!("Grammar is SLR(1): {}", yes_no(a.is_slr1()));
        }
    }
}

/// Lines to parse; a blank line ends the input.
fn input_lines(strings: &str) -> impl Iterator<Item = &str> {
    strings.lines().take_while(|line| !line.trim().is_empty())
}

fn run_parser(
    parser: &dyn Recognizer,
    strings: &str,
    trace: bool,
    output_format: OutputFormat,
) {
    println!("--- Using {} parser ---", parser.name());
    for line in input_lines(strings) {
        let input = symbols_of(line);
        if trace {
            let t = parser.trace(&input);
            println!("> {}", line);
            println!("{}", t.to_output(parser.name()).render(output_format));
        } else {
            println!("{}", if parser.accepts(&input) { "yes" } else { "no" });
        }
    }
}

fn main() {
    env_logger::init();

    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && OUTPUTS.contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut parse_request: Option<(&str, &str)> = None;
    let mut trace = false;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-p", "-t"].contains(&args[i].as_str()) {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::JSON,
            "-t" => trace = true,
            _ => {
                if i + 2 >= args.len() || !["ll1", "slr1", "auto"].contains(&args[i + 1].as_str()) {
                    print_help();
                    return;
                }
                parse_request = Some((args[i + 1].as_str(), args[i + 2].as_str()));
                i += 2;
            }
        }
        i += 1;
    }

    if i + 1 < args.len() || (outputs.is_empty() && parse_request.is_none()) {
        print_help();
        return;
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<String>, _>>()
            .unwrap_or_else(|e| fail(e))
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str())
            .unwrap_or_else(|e| fail(format!("failed to read {}: {}", args[i], e)))
    };

    let g = Grammar::parse(&input).unwrap_or_else(|e| fail(e));
    let analysis = Analysis::new(g);

    for output in outputs {
        let text = match output {
            "prod" => analysis
                .grammar
                .to_production_output_vec()
                .render(output_format),
            "ff" => analysis
                .grammar
                .to_non_terminal_output_vec(&analysis.first, &analysis.follow)
                .render(output_format),
            "ll1" => analysis
                .ll1
                .to_output(&analysis.grammar)
                .render(output_format),
            "lr0fsm" => analysis.fsm.to_output().render(output_format),
            "slr1table" => analysis
                .slr1
                .to_output(&analysis.grammar)
                .render(output_format),
            _ => {
                print_verdict(&analysis, output_format);
                continue;
            }
        };
        println!("{}", text);
    }

    if let Some((which, path)) = parse_request {
        let strings = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("failed to read {}: {}", path, e)));

        let parser: Box<dyn Recognizer + '_> = match which {
            "ll1" => {
                if !analysis.is_ll1() {
                    warn!("grammar is not LL(1), conflicting cells reject");
                }
                Box::new(analysis.ll1_parser())
            }
            "slr1" => {
                if !analysis.is_slr1() {
                    warn!("grammar is not SLR(1), conflicting cells reject");
                }
                Box::new(analysis.slr1_parser())
            }
            _ => analysis.preferred_parser().unwrap_or_else(|| {
                fail("grammar is neither LL(1) nor SLR(1), no parser available")
            }),
        };
        run_parser(parser.as_ref(), &strings, trace, output_format);
    }
}
