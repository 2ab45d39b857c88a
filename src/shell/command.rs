//! Line commands accepted by the interactive session

use std::path::PathBuf;

use crate::inputs::InputField;

/// Call metadata the user can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    ClientName,
    SalesRep,
    CallDate,
    SheetUrl,
}

/// Collapsible panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    CallInfo,
    SaveSection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(InputField, String),
    Meta(MetaField, String),
    Toggle(Panel),
    Save,
    Export(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  set <field> <value>     edit an input (customerBase, multiPurchaseRate,
                          inactiveCustomersCount, aov, purchaseFrequency, ltv,
                          multiPurchaseImprovement, churnReduction,
                          purchaseFreqImprovement)
  client <name>           set the client name
  rep <name>              set the sales rep name
  date <YYYY-MM-DD>       set the call date
  url <endpoint>          set the spreadsheet endpoint URL
  toggle call-info        show/hide the call information panel
  toggle save-section     show/hide the save panel
  save                    post a snapshot to the spreadsheet endpoint
  export [dir]            write a CSV snapshot
  show                    redraw
  quit                    exit";

impl Command {
    /// Parse one input line. An empty line redraws.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "save" => Ok(Command::Save),
            "export" => Ok(Command::Export(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "set" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(n, v)| (n, v.trim()))
                    .unwrap_or((rest, ""));
                if name.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                let field: InputField = name.parse()?;
                Ok(Command::Set(field, value.to_string()))
            }
            "client" => Ok(Command::Meta(MetaField::ClientName, rest.to_string())),
            "rep" => Ok(Command::Meta(MetaField::SalesRep, rest.to_string())),
            "date" => Ok(Command::Meta(MetaField::CallDate, rest.to_string())),
            "url" => Ok(Command::Meta(MetaField::SheetUrl, rest.to_string())),
            "toggle" => match rest.to_ascii_lowercase().as_str() {
                "call-info" | "call" => Ok(Command::Toggle(Panel::CallInfo)),
                "save-section" | "save" => Ok(Command::Toggle(Panel::SaveSection)),
                other => Err(format!("unknown panel '{}'", other)),
            },
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_commands() {
        assert_eq!(
            Command::parse("set aov 125.50"),
            Ok(Command::Set(InputField::Aov, "125.50".to_string()))
        );
        assert_eq!(
            Command::parse("  set churn_reduction   12 "),
            Ok(Command::Set(InputField::ChurnReduction, "12".to_string()))
        );
        // Missing value is an empty raw string, which coerces to 0
        assert_eq!(
            Command::parse("set ltv"),
            Ok(Command::Set(InputField::Ltv, String::new()))
        );
        assert!(Command::parse("set").is_err());
        assert!(Command::parse("set revenue 10").is_err());
    }

    #[test]
    fn test_metadata_keeps_spaces() {
        assert_eq!(
            Command::parse("client Acme Goods Inc"),
            Ok(Command::Meta(MetaField::ClientName, "Acme Goods Inc".to_string()))
        );
        assert_eq!(
            Command::parse("url"),
            Ok(Command::Meta(MetaField::SheetUrl, String::new()))
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("SAVE"), Ok(Command::Save));
        assert_eq!(Command::parse("export"), Ok(Command::Export(None)));
        assert_eq!(
            Command::parse("export /tmp/out"),
            Ok(Command::Export(Some(PathBuf::from("/tmp/out"))))
        );
        assert_eq!(Command::parse("toggle call-info"), Ok(Command::Toggle(Panel::CallInfo)));
        assert_eq!(Command::parse("toggle save-section"), Ok(Command::Toggle(Panel::SaveSection)));
        assert!(Command::parse("toggle sidebar").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }
}
