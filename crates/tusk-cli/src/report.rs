//! Warning rendering for terminal output.

use tusk_core::Warning;

/// Wrap column for rendered text.
const WIDTH: usize = 72;

const ACCURACY_NOTE: &str = "The inferred types are a static approximation and can be \
     inaccurate. When tusk cannot prove a column never holds NULL it errs on \
     the side of marking it nullable.";

const VERBOSE_HINT: &str = "Re-run with --verbose for details.";

const REPORT_HINT: &str = "If an inferred type looks wrong, please file an issue at \
     https://github.com/tuskql/tusk/issues with the SQL statement and the \
     schema it runs against.";

/// Renders warnings as fixed-width wrapped text.
///
/// Verbose output includes each warning's description and a bug-report
/// pointer; the terse form lists summaries only and says how to get the
/// rest. Returns an empty string when there is nothing to report.
#[must_use]
pub fn format_warnings(warnings: &[Warning], verbose: bool) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut blocks: Vec<Vec<String>> = Vec::new();
    if verbose {
        for warning in warnings {
            let mut block = wrap(&format!("WARNING: {}", warning.summary));
            if !warning.description.is_empty() {
                block.push(String::new());
                block.extend(wrap(&warning.description));
            }
            blocks.push(block);
        }
    } else {
        let mut block = Vec::new();
        for warning in warnings {
            block.extend(wrap(&format!("WARNING: {}", warning.summary)));
        }
        blocks.push(block);
    }
    blocks.push(wrap(ACCURACY_NOTE));
    blocks.push(wrap(if verbose { REPORT_HINT } else { VERBOSE_HINT }));

    let mut out = blocks
        .iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Greedy word wrap. Words longer than the wrap column get a line of
/// their own rather than being split.
fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.len() + 1 + word.len() <= WIDTH {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
