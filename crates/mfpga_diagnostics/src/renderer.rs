//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;

const RESET: &str = "\x1b[0m";

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E301]: group 'dsp' does not fit on any FPGA
///   --> group 'dsp'
///    = note: FPGA 'F0' has insufficient resources to map group 'dsp':
///            'LUT' : 95 / 88
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        if self.color {
            format!(
                "{}{}[{}]{RESET}: {}\n",
                diag.severity.ansi_color(),
                diag.severity,
                diag.code,
                diag.message
            )
        } else {
            format!("{}[{}]: {}\n", diag.severity, diag.code, diag.message)
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = self.header(diag);

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }

        // Multi-line notes (resource tables) keep their lines aligned.
        for note in &diag.notes {
            out.push_str(&format!("   = note: {}\n", note.replace('\n', "\n           ")));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
