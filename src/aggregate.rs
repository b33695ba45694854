/*!
 * Output rendering for aggregate mode
 *
 * Renders the selected file set into one text document, each file framed
 * by path-bearing markers, either plain or wrapped in the LLM instruction
 * envelope. Rendering is deterministic for an identical file set and
 * content: no timestamps, hostnames, or other run-varying data are
 * embedded.
 */

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::config::Config;
use crate::error::Result;
use crate::report::FileReportInfo;
use crate::select::SelectedFile;

/// Static operator instructions at the head of the LLM envelope
pub const LLM_PREAMBLE: &str = "\
You are given the contents of a codebase. Each file appears between
<file path=\"...\"> and </file> tags inside the <Codebase> block below.

When asked to modify the codebase, reply with a single <Modification>
block containing any number of these operations:

  <replace p=\"PATH\">NEW FILE CONTENT</replace>
  <create p=\"PATH\">NEW FILE CONTENT</create>
  <delete p=\"PATH\"></delete>

Paths are relative to the project root. File bodies are reproduced
verbatim, one operation body per tag pair, with the open and close tags
each on their own line. Do not place any other text inside the
<Modification> block.";

/// Opening marker of the envelope's codebase section
pub const CODEBASE_OPEN: &str = "<Codebase>";

/// Closing marker of the envelope's codebase section
pub const CODEBASE_CLOSE: &str = "</Codebase>";

/// Fixed trailing tag closing the LLM envelope
pub const LLM_TRAILER: &str = "\
<Reminder>
Reply with a single <Modification> block as described above.
</Reminder>";

/// Rendered output plus per-file statistics for the report
#[derive(Debug, Default)]
pub struct Rendered {
    /// The full output text
    pub text: String,
    /// Per-file line/char details, in render order
    pub details: Vec<(String, FileReportInfo)>,
    /// Files that became unreadable between selection and render
    pub warnings: Vec<String>,
}

/// Renderer and writer for the aggregate output document
pub struct Aggregator {
    /// Renderer configuration
    config: Config,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render the selected files into a single output document
    pub fn render(&self, files: &[SelectedFile]) -> Rendered {
        let mut rendered = Rendered::default();

        if let Some(instructions) = &self.config.llm_instructions {
            rendered.text.push_str(LLM_PREAMBLE);
            rendered.text.push('\n');
            if !instructions.is_empty() {
                rendered.text.push('\n');
                rendered.text.push_str(instructions);
                rendered.text.push('\n');
            }
            rendered.text.push('\n');
            rendered.text.push_str(CODEBASE_OPEN);
            rendered.text.push('\n');

            for file in files {
                self.render_file(file, true, &mut rendered);
            }

            rendered.text.push_str(CODEBASE_CLOSE);
            rendered.text.push('\n');
            rendered.text.push('\n');
            rendered.text.push_str(LLM_TRAILER);
            rendered.text.push('\n');
        } else {
            for file in files {
                self.render_file(file, false, &mut rendered);
            }
        }

        rendered
    }

    /// Render one file with its framing markers
    fn render_file(&self, file: &SelectedFile, envelope: bool, rendered: &mut Rendered) {
        let content = match std::fs::read_to_string(&file.abs_path) {
            Ok(c) => c,
            Err(e) => {
                rendered
                    .warnings
                    .push(format!("skipped {}: {}", file.display_path, e));
                return;
            }
        };

        let lines = content.lines().count();
        let chars = content.chars().count();

        if envelope {
            rendered
                .text
                .push_str(&format!("<file path=\"{}\">\n", file.display_path));
            rendered.text.push_str(&content);
            if !content.ends_with('\n') && !content.is_empty() {
                rendered.text.push('\n');
            }
            rendered.text.push_str("</file>\n\n");
        } else {
            rendered
                .text
                .push_str(&format!("----- FILE: {} -----\n", file.display_path));
            rendered.text.push_str(&content);
            rendered.text.push('\n');
            rendered
                .text
                .push_str(&format!("----- END FILE: {} -----\n\n", file.display_path));
        }

        rendered
            .details
            .push((file.display_path.clone(), FileReportInfo { lines, chars }));
    }

    /// Truncate and rewrite the output artifact with the rendered text
    pub fn write(&self, rendered: &Rendered) -> Result<()> {
        let file = File::create(&self.config.output_file)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.text.as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}
