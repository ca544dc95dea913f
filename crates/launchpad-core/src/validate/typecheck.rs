//! Type-checker pass. Always passes; problems are warnings.

use super::{CheckCategory, CheckReport};
use crate::exec::{CommandRunner, CommandSpec};
use crate::report::Finding;

pub fn check_typecheck<R: CommandRunner + ?Sized>(runner: &R, argv: &[String]) -> CheckReport {
    let mut report = CheckReport::new(CheckCategory::TypeCheck);

    let Some(spec) = CommandSpec::from_argv(argv) else {
        report.push(Finding::info("Type check disabled"));
        return report;
    };

    let output = runner.run(&spec);
    if output.success {
        report.push(Finding::ok("Type check passed without errors"));
    } else if output.timed_out {
        report.push(Finding::warn(format!(
            "`{}` timed out; continuing anyway",
            spec
        )));
    } else {
        let code = output
            .exit_code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "did not run".to_string());
        report.push(Finding::warn(format!(
            "`{}` reported problems ({}); probably safe to ignore",
            spec, code
        )));
        if let Some(line) = output.summary_line() {
            report.push(Finding::info(line.to_string()));
        }
    }

    report
}
