//! Label renderer
//!
//! Renders a [`Label`] into the LaTeX document the toolchain compiles.
//! Pure text substitution over the bundled template — no I/O.

/// The bundled label template (QR code + box number + title).
const TEMPLATE: &str = include_str!("../../templates/label.tex");

/// Data printed on one box label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Payload encoded into the QR code (the box permalink URL)
    pub qr_contents: String,
    /// Box id, printed human-readable next to the QR code
    pub no: i64,
    /// Box title
    pub title: String,
}

impl Label {
    /// Render the label to LaTeX source.
    ///
    /// Substituted values are escaped, so titles containing LaTeX
    /// control characters neither break compilation nor inject markup.
    pub fn render(&self) -> String {
        TEMPLATE
            .replace("QR_CONTENTS", &escape_latex(&self.qr_contents))
            .replace("NO", &self.no.to_string())
            .replace("TITLE", &escape_latex(&self.title))
    }
}

/// Escape LaTeX control characters and strip ASCII control characters.
fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '#' => out.push_str(r"\#"),
            '$' => out.push_str(r"\$"),
            '%' => out.push_str(r"\%"),
            '&' => out.push_str(r"\&"),
            '_' => out.push_str(r"\_"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            c if c.is_ascii_control() => {}
            c => out.push(c),
        }
    }
    out
}
