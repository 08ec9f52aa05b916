//! Text rendering of a dashboard.

use std::collections::HashMap;
use std::fmt::{self, Write};

use dividas_core::money::format_brl;
use dividas_core::purchase::Dashboard;
use dividas_core::schedule::Purchase;
use dividas_shared::types::{PurchaseId, UserId};

/// Renders one owner's dashboard.
///
/// `purchases` supplies product and store names for the summaries.
pub fn dashboard(
    owner: UserId,
    dashboard: &Dashboard,
    purchases: &[Purchase],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, owner, dashboard, purchases)?;
    Ok(out)
}

fn write_dashboard(
    out: &mut impl Write,
    owner: UserId,
    dashboard: &Dashboard,
    purchases: &[Purchase],
) -> fmt::Result {
    let names: HashMap<PurchaseId, &Purchase> = purchases.iter().map(|p| (p.id, p)).collect();

    writeln!(out, "Owner {owner} - reference {}", dashboard.reference_date)?;

    writeln!(out, "\nUpcoming")?;
    if dashboard.upcoming.is_empty() {
        writeln!(out, "  nothing pending")?;
    }
    for bucket in &dashboard.upcoming {
        writeln!(out, "  {}  {:>16}", bucket.month, format_brl(bucket.amount))?;
    }

    let totals = &dashboard.totals;
    writeln!(out, "\nTotals")?;
    writeln!(
        out,
        "  purchases  {} ({} open)",
        totals.purchase_count, totals.open_count
    )?;
    writeln!(out, "  paid       {}", format_brl(totals.total_paid))?;
    writeln!(out, "  remaining  {}", format_brl(totals.total_remaining))?;
    writeln!(out, "  total      {}", format_brl(totals.grand_total))?;

    writeln!(out, "\nPurchases")?;
    for summary in &dashboard.summaries {
        let label = names.get(&summary.purchase_id).map_or_else(
            || summary.purchase_id.to_string(),
            |p| format!("{} ({})", p.product, p.store),
        );
        let next = summary
            .next_due
            .map_or_else(|| "settled".to_string(), |d| format!("next {d}"));
        writeln!(
            out,
            "  {label}  {}/{}  {}%  remaining {}  {next}",
            summary.paid_count,
            summary.paid_count + summary.pending_count,
            summary.progress_percent,
            format_brl(summary.remaining),
        )?;
    }

    Ok(())
}
