//! Line-oriented form: set fields one at a time, then submit.

use std::io::{self, BufRead, Write};

use churn_predict::{CustomerForm, Predictor};

use crate::render;

const HELP: &[&str] = &[
    "commands: :help, :show, :reset, :predict, :importance, :quit",
    "set a field with `<field> <value>` or `<field>=<value>`:",
    "  gender          Male | Female",
    "  senior_citizen  0 | 1",
    "  partner         Yes | No",
    "  dependents      Yes | No",
    "  tenure          0..=72 months",
    "  monthly_charges 0.0..=200.0",
    "  total_charges   0.0..=10000.0",
];

#[derive(Debug, Default)]
pub struct FormSession {
    form: CustomerForm,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    pub fn prompt(&self) -> &'static str {
        "churn> "
    }

    fn show(&self) -> Vec<String> {
        let f = &self.form;
        vec![
            format!("  gender          {}", f.gender),
            format!("  senior_citizen  {}", f.senior_citizen),
            format!("  partner         {}", f.partner),
            format!("  dependents      {}", f.dependents),
            format!("  tenure          {}", f.tenure),
            format!("  monthly_charges {:.2}", f.monthly_charges),
            format!("  total_charges   {:.2}", f.total_charges),
        ]
    }

    /// Apply one field assignment; the form only changes if the new value
    /// passes validation.
    fn assign(&mut self, field: &str, value: &str) -> Result<(), String> {
        let mut next = self.form.clone();
        let parse_f64 = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("'{v}' is not a number"))
        };
        match field {
            "gender" => next.gender = value.to_string(),
            "senior_citizen" | "senior" => {
                next.senior_citizen = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not 0 or 1"))?
            }
            "partner" => next.partner = value.to_string(),
            "dependents" => next.dependents = value.to_string(),
            "tenure" => {
                next.tenure = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a whole number of months"))?
            }
            "monthly_charges" | "monthly" => next.monthly_charges = parse_f64(value)?,
            "total_charges" | "total" => next.total_charges = parse_f64(value)?,
            other => return Err(format!("unknown field '{other}' (try :help)")),
        }
        next.validate().map_err(|e| e.to_string())?;
        self.form = next;
        Ok(())
    }

    /// Returns the lines to print and whether the session should end.
    pub fn handle_line(&mut self, line: &str, predictor: &Predictor) -> (Vec<String>, bool) {
        let trimmed = line.trim();
        match trimmed {
            "" => return (Vec::new(), false),
            ":help" | ":h" => return (HELP.iter().map(|s| s.to_string()).collect(), false),
            ":q" | ":quit" | ":exit" => return (Vec::new(), true),
            ":show" => return (self.show(), false),
            ":reset" => {
                self.form = CustomerForm::default();
                return (vec!["form reset to defaults".to_string()], false);
            }
            ":predict" | ":submit" => {
                let out = match predictor.predict(&self.form) {
                    Ok(result) => render::prediction(&result),
                    Err(e) => vec![format!("error: {e}")],
                };
                return (out, false);
            }
            ":importance" => {
                let artifact = predictor.artifact();
                return (
                    render::importance(artifact.backend(), &artifact.feature_names, 10),
                    false,
                );
            }
            _ => {}
        }
        if trimmed.starts_with(':') {
            return (vec![format!("error: unknown command '{trimmed}' (try :help)")], false);
        }

        let split = trimmed
            .split_once('=')
            .or_else(|| trimmed.split_once(char::is_whitespace));
        let Some((field, value)) = split else {
            return (vec![format!("error: expected `<field> <value>`, got '{trimmed}'")], false);
        };
        let (field, value) = (field.trim(), value.trim());
        match self.assign(field, value) {
            Ok(()) => (vec![format!("{field} = {value}")], false),
            Err(e) => (vec![format!("error: {e}")], false),
        }
    }
}

/// Drive a session over any line source. Returns on `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    predictor: &Predictor,
) -> io::Result<()> {
    let mut session = FormSession::new();
    writeln!(output, "Enter customer details; :help lists commands, :predict submits.")?;
    write!(output, "{}", session.prompt())?;
    output.flush()?;
    for line in input.lines() {
        let (out, exit) = session.handle_line(&line?, predictor);
        for l in out {
            writeln!(output, "{l}")?;
        }
        if exit {
            return Ok(());
        }
        write!(output, "{}", session.prompt())?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}
