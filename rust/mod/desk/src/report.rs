//! Dashboard figures, sales reports and CSV export.
//!
//! CSV output joins fields with `,` and rows with `\n` and never quotes or
//! escapes. A free-text field containing a comma shifts the columns of its row.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Appointment, BrokerAccount, Client, PlanType, Sale, SaleStatus};

/// Optional narrowing of a sales report. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub plan_type: Option<PlanType>,
    /// Case-insensitive substring of the client name.
    pub client: Option<String>,
}

impl SalesFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        if self.from.is_some_and(|from| sale.sale_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| sale.sale_date > to) {
            return false;
        }
        if self.plan_type.is_some_and(|p| sale.plan_type != p) {
            return false;
        }
        match &self.client {
            Some(term) => sale
                .client_name
                .to_lowercase()
                .contains(&term.trim().to_lowercase()),
            None => true,
        }
    }

    pub fn apply<'a>(&self, sales: impl IntoIterator<Item = &'a Sale>) -> Vec<&'a Sale> {
        sales.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Count and summed amount of a group of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub count: usize,
    pub amount: f64,
}

impl Tally {
    fn add(&mut self, sale: &Sale) {
        self.count += 1;
        self.amount += sale.amount;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total: Tally,
    /// Only plan types with at least one sale, in vocabulary order.
    pub by_plan_type: Vec<(PlanType, Tally)>,
    /// Only statuses with at least one sale, in vocabulary order.
    pub by_status: Vec<(SaleStatus, Tally)>,
}

impl SalesReport {
    pub fn build<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        let mut total = Tally::default();
        let mut plans = vec![Tally::default(); PlanType::ALL.len()];
        let mut statuses = vec![Tally::default(); SaleStatus::ALL.len()];

        for sale in sales {
            total.add(sale);
            if let Some(i) = PlanType::ALL.iter().position(|p| *p == sale.plan_type) {
                plans[i].add(sale);
            }
            if let Some(i) = SaleStatus::ALL.iter().position(|s| *s == sale.status) {
                statuses[i].add(sale);
            }
        }

        Self {
            total,
            by_plan_type: PlanType::ALL
                .iter()
                .copied()
                .zip(plans)
                .filter(|(_, t)| t.count > 0)
                .collect(),
            by_status: SaleStatus::ALL
                .iter()
                .copied()
                .zip(statuses)
                .filter(|(_, t)| t.count > 0)
                .collect(),
        }
    }
}

/// Per-broker line of the administrator report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerSummary {
    pub broker_id: String,
    pub name: String,
    pub email: String,
    pub clients: usize,
    pub sales: Tally,
    pub appointments: usize,
}

pub fn broker_summaries(
    brokers: &[BrokerAccount],
    clients: &[Client],
    sales: &[Sale],
    appointments: &[Appointment],
) -> Vec<BrokerSummary> {
    brokers
        .iter()
        .map(|b| {
            let mut tally = Tally::default();
            sales
                .iter()
                .filter(|s| s.owner_id == b.id)
                .for_each(|s| tally.add(s));
            BrokerSummary {
                broker_id: b.id.clone(),
                name: b.name.clone(),
                email: b.email.clone(),
                clients: clients.iter().filter(|c| c.owner_id == b.id).count(),
                sales: tally,
                appointments: appointments.iter().filter(|a| a.owner_id == b.id).count(),
            }
        })
        .collect()
}

/// Figures shown on a broker's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerDashboard {
    pub clients: usize,
    pub appointments: usize,
    pub sales: Tally,
    pub quotes: usize,
    pub unread_notifications: usize,
}

/// Figures shown on the administrator overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub brokers: usize,
    pub clients: usize,
    pub sales: Tally,
}

fn csv<I, R>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut lines = vec![header.join(",")];
    for row in rows {
        lines.push(row.into_iter().collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

pub fn sales_csv<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> String {
    csv(
        &["Client", "Plan type", "Date", "Amount", "Status"],
        sales.into_iter().map(|s| {
            [
                s.client_name.clone(),
                s.plan_type.label().to_string(),
                s.sale_date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", s.amount),
                s.status.label().to_string(),
            ]
        }),
    )
}

pub fn brokers_csv(summaries: &[BrokerSummary]) -> String {
    csv(
        &["Broker", "Email", "Clients", "Sales", "Total amount", "Appointments"],
        summaries.iter().map(|b| {
            [
                b.name.clone(),
                b.email.clone(),
                b.clients.to_string(),
                b.sales.count.to_string(),
                format!("{:.2}", b.sales.amount),
                b.appointments.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sale(client: &str, plan: PlanType, day: u32, amount: f64, status: SaleStatus, owner: &str) -> Sale {
        Sale {
            id: format!("{}-{}", client, day),
            client_id: "c".into(),
            client_name: client.into(),
            plan_type: plan,
            sale_date: date(day),
            amount,
            status,
            owner_id: owner.into(),
        }
    }

    fn sales() -> Vec<Sale> {
        vec![
            sale("Maria", PlanType::HealthPlan, 1, 100.0, SaleStatus::Approved, "7"),
            sale("Joao", PlanType::AutoInsurance, 10, 50.5, SaleStatus::Pending, "7"),
            sale("Mariana", PlanType::HealthPlan, 20, 200.0, SaleStatus::Cancelled, "9"),
        ]
    }

    #[test]
    fn report_groups_by_plan_and_status() {
        let all = sales();
        let report = SalesReport::build(&all);
        assert_eq!(report.total.count, 3);
        assert!((report.total.amount - 350.5).abs() < 1e-9);
        assert_eq!(report.by_plan_type.len(), 2);
        assert_eq!(report.by_plan_type[0].0, PlanType::HealthPlan);
        assert_eq!(report.by_plan_type[0].1.count, 2);
        assert_eq!(report.by_status.len(), 3);
    }

    #[test]
    fn filter_date_range_is_inclusive() {
        let all = sales();
        let filter = SalesFilter {
            from: Some(date(1)),
            to: Some(date(10)),
            ..Default::default()
        };
        assert_eq!(filter.apply(&all).len(), 2);

        let filter = SalesFilter {
            plan_type: Some(PlanType::HealthPlan),
            client: Some("mari".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&all).len(), 2);

        let filter = SalesFilter {
            client: Some("ANA".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&all).len(), 1);
    }

    #[test]
    fn csv_is_unquoted() {
        let mut all = sales();
        all.truncate(1);
        assert_eq!(
            sales_csv(&all),
            "Client,Plan type,Date,Amount,Status\nMaria,Health plan,2024-03-01,100.00,Approved"
        );

        // A comma in a free-text field shifts the row: six fields instead of five.
        all[0].client_name = "Silva, Maria".into();
        let out = sales_csv(&all);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row.split(',').count(), 6);
    }

    #[test]
    fn broker_summary_counts_owned_records() {
        let brokers = vec![BrokerAccount {
            id: "7".into(),
            name: "Ana".into(),
            email: "ana@x.com".into(),
            phone: String::new(),
            address: String::new(),
            registry_number: None,
            photo: None,
            password_hash: String::new(),
            role: crate::model::Role::Broker,
        }];
        let summaries = broker_summaries(&brokers, &[], &sales(), &[]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].sales.count, 2);
        assert!((summaries[0].sales.amount - 150.5).abs() < 1e-9);
        assert_eq!(
            brokers_csv(&summaries),
            "Broker,Email,Clients,Sales,Total amount,Appointments\nAna,ana@x.com,0,2,150.50,0"
        );
    }
}
