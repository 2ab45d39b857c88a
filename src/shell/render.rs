//! Plain-text rendering of the calculator screen

use std::fmt::Write;
use std::time::Instant;

use super::session::Session;
use crate::derivation::StateMetrics;
use crate::format::{count, currency, percent};

/// Render every visible panel of `session` as of `now`
pub fn render(session: &Session, now: Instant) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_screen(&mut out, session, now);
    out
}

fn write_screen(out: &mut String, session: &Session, now: Instant) -> std::fmt::Result {
    let inputs = session.inputs();
    let results = session.results();
    let insights = session.insights();
    let meta = session.meta();
    let panels = session.panels();

    writeln!(out, "Customer Retention Calculator")?;
    writeln!(out, "=============================")?;

    if panels.call_info {
        writeln!(out)?;
        writeln!(out, "-- Call Information --")?;
        writeln!(out, "  Client Name:    {}", or_placeholder(&meta.client_name))?;
        writeln!(out, "  Sales Rep:      {}", or_placeholder(&meta.sales_rep_name))?;
        writeln!(out, "  Call Date:      {}", meta.call_date)?;
    }

    writeln!(out)?;
    writeln!(out, "-- Current Customer Metrics --")?;
    let customer_base = i64::try_from(inputs.customer_base).unwrap_or(i64::MAX);
    writeln!(out, "  Total Customer Base:      {}", count(customer_base))?;
    writeln!(
        out,
        "  Multi-Purchase Rate:      {}  ({} customers)",
        percent(inputs.multi_purchase_rate),
        count(results.current_state.multi_purchase_customers)
    )?;
    writeln!(
        out,
        "  Inactive Customers:       {}  ({} of total customer base)",
        count(results.current_state.inactive_customers),
        percent(insights.inactive_share)
    )?;
    writeln!(out, "  Average Order Value:      ${}", inputs.aov)?;
    writeln!(out, "  Purchase Frequency:       {:.1} per year", inputs.purchase_frequency)?;
    writeln!(out, "  Customer LTV:             ${}", inputs.ltv)?;
    writeln!(
        out,
        "  Customer Health:          {} inactive, {} active",
        percent(insights.inactive_share),
        percent(insights.active_share)
    )?;

    writeln!(out)?;
    writeln!(out, "-- Improvement Goals --")?;
    writeln!(
        out,
        "  Multi-Purchase Rate:      +{} pts  (adds {} multi-purchase customers)",
        inputs.multi_purchase_improvement,
        count(insights.multi_purchase_preview)
    )?;
    writeln!(
        out,
        "  Churn Reduction:          {} pts  (reactivates {} customers, {}% of inactive base)",
        inputs.churn_reduction,
        count(insights.reactivation_preview),
        insights.reactivation_share
    )?;
    writeln!(
        out,
        "  Purchase Frequency:       +{}  (from {:.1} to {:.1} per year, {}% increase)",
        inputs.purchase_freq_improvement,
        insights.frequency_from,
        insights.frequency_to,
        insights.frequency_increase_pct
    )?;

    writeln!(out)?;
    writeln!(out, "-- Current State --")?;
    write_state(out, &results.current_state, percent(inputs.multi_purchase_rate))?;

    writeln!(out)?;
    writeln!(out, "-- Improved State --")?;
    write_state(out, &results.improved_state, percent(insights.target_multi_purchase_rate))?;

    writeln!(out)?;
    writeln!(out, "-- Impact --")?;
    writeln!(
        out,
        "  Additional Multi-Purchasers: +{}  ({} increase)",
        count(results.impact.additional_customers),
        percent(insights.multi_purchase_growth_pct)
    )?;
    writeln!(
        out,
        "  Reactivated Customers:       {}  ({} of inactive base)",
        count(results.impact.reduced_churn),
        percent(insights.reduced_churn_share_pct)
    )?;
    writeln!(
        out,
        "  Annual Revenue Increase:     {}  ({} growth)",
        currency(results.impact.revenue_increase),
        percent(insights.revenue_growth_pct)
    )?;
    writeln!(
        out,
        "  Total LTV Increase:          {}  ({} growth)",
        currency(results.impact.ltv_increase),
        percent(insights.ltv_growth_pct)
    )?;

    writeln!(out)?;
    writeln!(out, "-- Return on Investment --")?;
    writeln!(out, "  First-year ROI: {}%", insights.first_year_roi_pct)?;
    writeln!(out, "  (solution cost assumed at 2% of current annual revenue)")?;

    if panels.save_section {
        writeln!(out)?;
        writeln!(out, "-- Save --")?;
        writeln!(out, "  Spreadsheet URL: {}", or_placeholder(&meta.google_sheet_url))?;
        if !meta.ready_to_save() {
            writeln!(out, "  (enter a client name and URL to enable saving)")?;
        }
        if let Some(status) = session.save_status(now) {
            writeln!(out, "  {}", status.message())?;
        }
    }

    Ok(())
}

fn write_state(out: &mut String, state: &StateMetrics, rate_label: String) -> std::fmt::Result {
    writeln!(
        out,
        "  Multi-Purchase Customers: {} ({})",
        count(state.multi_purchase_customers),
        rate_label
    )?;
    writeln!(
        out,
        "  Inactive Customers:       {} ({})",
        count(state.inactive_customers),
        percent(state.inactive_rate)
    )?;
    writeln!(out, "  Annual Revenue:           {}", currency(state.annual_revenue))?;
    writeln!(out, "  Total Customer LTV:       {}", currency(state.total_ltv))
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::SaveError;
    use crate::shell::Panel;
    use std::time::Duration;

    #[test]
    fn test_default_screen() {
        let session = Session::new(SessionConfig::default());
        let screen = render(&session, Instant::now());

        assert!(screen.contains("-- Call Information --"));
        assert!(screen.contains("Annual Revenue:           $140,000"));
        assert!(screen.contains("Annual Revenue:           $187,500"));
        assert!(screen.contains("Annual Revenue Increase:     $47,500  (33.9% growth)"));
        assert!(screen.contains("Inactive Customers:       250 (25.0%)"));
        assert!(screen.contains("First-year ROI: 1696%"));
        assert!(screen.contains("reactivates 50 customers, 17% of inactive base"));
    }

    #[test]
    fn test_hidden_panels_are_not_rendered() {
        let mut session = Session::new(SessionConfig::default());
        session.toggle(Panel::CallInfo);
        session.toggle(Panel::SaveSection);
        let screen = render(&session, Instant::now());

        assert!(!screen.contains("-- Call Information --"));
        assert!(!screen.contains("-- Save --"));
        assert!(screen.contains("-- Impact --"));
    }

    #[test]
    fn test_status_message_clears() {
        let mut session = Session::new(SessionConfig::default());
        let now = Instant::now();
        session.record_save(&Err(SaveError::Transport("HTTP 404".to_string())), now);

        assert!(render(&session, now).contains("Error saving data"));
        assert!(!render(&session, now + Duration::from_secs(3)).contains("Error saving data"));
    }
}
