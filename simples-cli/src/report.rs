//! Presentation of calculation results for the terminal.

use std::fmt::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use simples_core::CalculationResult;
use simples_core::calculations::{RegimeTrace, SelectionTrace};

/// A result together with the trace it was selected from.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub result: CalculationResult,
    pub trace: SelectionTrace,
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    #[serde(flatten)]
    result: &'a CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a SelectionTrace>,
}

/// Renders outcomes as pretty JSON: a single object for one outcome, an
/// array for a batch.
pub fn render_json(
    outcomes: &[Outcome],
    with_trace: bool,
) -> serde_json::Result<String> {
    let rows: Vec<JsonOutcome<'_>> = outcomes
        .iter()
        .map(|o| JsonOutcome {
            result: &o.result,
            trace: with_trace.then_some(&o.trace),
        })
        .collect();

    match rows.as_slice() {
        [single] => serde_json::to_string_pretty(single),
        _ => serde_json::to_string_pretty(&rows),
    }
}

/// Renders outcomes as text. Batches number each entry from 1.
pub fn render_text(
    outcomes: &[Outcome],
    with_trace: bool,
) -> String {
    let numbered = outcomes.len() > 1;
    let mut out = String::new();

    for (index, outcome) in outcomes.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if numbered {
            let _ = write!(out, "#{} ", index + 1);
        }
        let _ = writeln!(
            out,
            "Net monthly income: {} ({})",
            outcome.result.net_monthly_income, outcome.result.winning_regime
        );
        if with_trace {
            out.push_str(&trace_table(&outcome.trace));
        }
    }
    out
}

/// One column per regime, one line per intermediate figure.
fn trace_table(trace: &SelectionTrace) -> String {
    let [a, b] = &trace.evaluations;
    let lines: [(&str, fn(&RegimeTrace) -> String); 12] = [
        ("Personal income", |t| money(t.personal_income)),
        ("Social-security cut", |t| money(t.withholding.social_security_cut)),
        ("Income-tax base", |t| money(t.withholding.income_tax_base)),
        ("Income-tax rate", |t| t.withholding.income_tax_rate.to_string()),
        ("Income tax", |t| money(t.withholding.income_tax)),
        ("Discounted (%)", |t| money(t.percentage_discounted)),
        ("Net personal income", |t| money(t.withholding.net_personal_income)),
        ("Revenue tier", |t| (t.entity.bracket_index + 1).to_string()),
        ("Entity rate", |t| t.entity.rate.normalize().to_string()),
        ("Entity tax", |t| money(t.entity_tax)),
        ("Monthly deduction", |t| money(t.entity.deduction_per_month)),
        ("Net income", |t| money(t.net_income)),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "  {:<22}{:>16}{:>16}", "", a.regime.label(), b.regime.label());
    for (label, value) in lines {
        let _ = writeln!(out, "  {:<22}{:>16}{:>16}", label, value(a), value(b));
    }
    out
}

/// Two decimal places, whatever scale the value carries.
fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use simples_core::{CalculationInput, Regime, select_best_regime_traced};

    use super::*;

    fn outcome(input: CalculationInput) -> Outcome {
        let (result, trace) = select_best_regime_traced(&input).unwrap();
        Outcome { result, trace }
    }

    fn scenario_a() -> Outcome {
        outcome(CalculationInput::new(dec!(5000), dec!(60000)))
    }

    #[test]
    fn text_single_outcome_has_no_number() {
        let text = render_text(&[scenario_a()], false);

        assert_eq!(text, "Net monthly income: 4574.00 (Attachment 3)\n");
    }

    #[test]
    fn text_batch_numbers_each_outcome() {
        let high = outcome(CalculationInput::new(dec!(400000), dec!(4000000)));

        let text = render_text(&[scenario_a(), high], false);

        assert!(text.starts_with("#1 Net monthly income: 4574.00 (Attachment 3)\n"));
        assert!(text.contains("#2 Net monthly income: 322890.92 (Attachment 5)\n"));
    }

    #[test]
    fn text_trace_lists_both_regimes() {
        let text = render_text(&[scenario_a()], true);

        assert!(text.contains("Attachment 3"));
        assert!(text.contains("Attachment 5"));
        assert!(text.contains("Social-security cut"));
        assert!(text.contains("126.00"));
        assert!(text.contains("109.08"));
        assert!(text.contains("4115.92"));
    }

    #[test]
    fn money_pads_to_cents() {
        assert_eq!(money(dec!(1212)), "1212.00");
        assert_eq!(money(dec!(0)), "0.00");
    }

    #[test]
    fn json_single_outcome_is_an_object() {
        let json = render_json(&[scenario_a()], false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["winning_regime"], "attachment_3");
        assert_eq!(value["net_monthly_income"], "4574.00");
        assert!(value.get("trace").is_none());
    }

    #[test]
    fn json_batch_is_an_array_with_traces() {
        let json = render_json(&[scenario_a(), scenario_a()], true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(
            value[0]["trace"]["evaluations"][1]["regime"],
            serde_json::json!(Regime::Attachment5.as_str())
        );
    }
}
