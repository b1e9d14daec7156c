use crate::application::engine::LedgerReport;
use crate::application::settlement::Transfer;
use crate::domain::money::Money;
use crate::domain::project::Project;
use crate::error::LedgerError;
use std::io::Write;

const BALANCE_HEADERS: [&str; 6] = ["member", "name", "paid", "owed", "adjustment", "balance"];
const TRANSFER_HEADERS: [&str; 4] = ["kind", "from", "to", "amount"];

/// Writes a ledger report as CSV: one balance row per active member, then one
/// row per suggested settlement transfer and per pairwise debt.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

fn cell(amount: Money) -> String {
    amount.round_dp(2).to_string()
}

impl<W: Write> ReportWriter<W> {
    pub fn new(dest: W) -> Self {
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(dest);
        Self { writer }
    }

    pub fn write_report(
        &mut self,
        project: &Project,
        report: &LedgerReport,
    ) -> Result<(), LedgerError> {
        let balances = &report.balances;
        self.writer.write_record(BALANCE_HEADERS)?;
        for (id, balance) in &balances.balance {
            let amounts = [
                balances.paid[id],
                balances.owed[id],
                balances.adjustments[id],
                *balance,
            ]
            .map(cell);
            let mut record = vec![id.as_str(), project.member_name(id.as_str())];
            record.extend(amounts.iter().map(String::as_str));
            self.writer.write_record(&record)?;
        }

        self.writer.write_record(TRANSFER_HEADERS)?;
        self.write_transfers("settlement", &report.settlement)?;
        self.write_transfers("pairwise", &report.pairwise)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_transfers(&mut self, kind: &str, transfers: &[Transfer]) -> Result<(), LedgerError> {
        for t in transfers {
            let amount = cell(t.amount);
            self.writer
                .write_record([kind, t.from.as_str(), t.to.as_str(), amount.as_str()])?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, LedgerError> {
        self.writer
            .into_inner()
            .map_err(|e| LedgerError::Io(e.into_error()))
    }
}
