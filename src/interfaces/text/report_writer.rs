use crate::application::engine::LedgerReport;
use crate::application::settlement::Transfer;
use crate::domain::money::format_money;
use crate::domain::project::Project;
use crate::error::LedgerError;
use std::io::Write;

/// Renders a ledger report for people: member names instead of ids and
/// amounts in whole currency units.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_report(
        &mut self,
        project: &Project,
        report: &LedgerReport,
    ) -> Result<(), LedgerError> {
        let symbol = project.currency_symbol.as_str();
        let money = |amount| format_money(amount, symbol);

        writeln!(self.writer, "{} ({})", project.name, project.rounding_rule)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Balances")?;
        let balances = &report.balances;
        for (id, balance) in &balances.balance {
            writeln!(
                self.writer,
                "  {:<12} paid {:>10}  owed {:>10}  adjustment {:>10}  balance {:>10}",
                project.member_name(id.as_str()),
                money(balances.paid[id]),
                money(balances.owed[id]),
                money(balances.adjustments[id]),
                money(*balance),
            )?;
        }

        self.write_transfers(project, "Settlement", &report.settlement, "Nothing to settle.")?;
        self.write_transfers(project, "Pairwise", &report.pairwise, "No outstanding debts.")?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_transfers(
        &mut self,
        project: &Project,
        title: &str,
        transfers: &[Transfer],
        empty: &str,
    ) -> Result<(), LedgerError> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{title}")?;
        if transfers.is_empty() {
            writeln!(self.writer, "  {empty}")?;
        }
        for t in transfers {
            writeln!(
                self.writer,
                "  {} -> {}  {}",
                project.member_name(t.from.as_str()),
                project.member_name(t.to.as_str()),
                format_money(t.amount, &project.currency_symbol),
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
