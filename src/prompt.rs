use std::io::{
    BufRead,
    Write,
};

use crate::core::WordpackError;

/// Lists `labels` and reads indexes from `input` until one is in range.
pub fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
    labels: &[String],
) -> Result<usize, WordpackError> {
    if labels.is_empty() {
        return Err(WordpackError::Custom(format!("Nothing to choose for: {}", title)));
    }

    writeln!(output, "{}", title)?;
    for (i, label) in labels.iter().enumerate() {
        writeln!(output, "[ {} ] => {}", i, label)?;
    }

    let mut line = String::new();
    loop {
        write!(output, "\n--> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(WordpackError::PromptClosed);
        }

        match line.trim().parse::<usize>() {
            Ok(index) if index < labels.len() => return Ok(index),
            _ => writeln!(output, "Enter a number between 0 and {}", labels.len() - 1)?,
        }
    }
}
