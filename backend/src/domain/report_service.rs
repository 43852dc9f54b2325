//! Read-only reports assembled from stored documents.

use serde::Serialize;

use super::aggregates::{
    BucketCount, CalloutReport, CategoryRules, DateFilter, DeltaReport, DepartmentTotals,
    Diagnostics, InventoryReport, MachineReport, MonthCount, Period, Reading, Total,
    WarehouseFilter, WeekTotals, callouts, count_by_month, department_totals, machine_report,
    period_deltas, reconcile, week_totals,
};
use super::records::{
    DailySheet, DoneRoster, Inventory, LogFilter, QuotaSheet, ServiceLog, TripLog, WarehouseLog,
};
use super::{CollectionDocument, Error, RecordBook};

/// Default logistics cost per odometer unit.
pub const DEFAULT_COST_PER_KM: f64 = 0.05;

/// Tunables for the reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Cost per odometer unit.
    pub cost_per_km: f64,
    /// Destination buckets.
    pub destination_rules: CategoryRules,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            cost_per_km: DEFAULT_COST_PER_KM,
            destination_rules: CategoryRules::logistics_destinations(),
        }
    }
}

/// Per-vehicle distance and cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogisticsCosts {
    /// Cost per odometer unit used.
    pub rate: f64,
    /// Monthly rows.
    pub monthly: DeltaReport,
    /// Yearly rows.
    pub yearly: DeltaReport,
}

/// Deliveries by destination bucket and by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSummary {
    /// Trips per destination bucket.
    pub destinations: Vec<BucketCount>,
    /// Trips per departure month.
    pub deliveries_per_month: Vec<MonthCount>,
    /// Trips without a readable departure time are skipped from the months.
    pub diagnostics: Diagnostics,
}

/// Assembles reports from the record book.
#[derive(Clone)]
pub struct ReportService {
    book: RecordBook,
    settings: ReportSettings,
}

impl ReportService {
    /// Create the service.
    #[must_use]
    pub fn new(book: RecordBook, settings: ReportSettings) -> Self {
        Self { book, settings }
    }

    async fn load<D: CollectionDocument>(&self) -> Result<D, Error> {
        Ok(self.book.store::<D>().load_or_default().await?.document)
    }

    /// Monthly and yearly odometer deltas per vehicle.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn logistics_costs(&self) -> Result<LogisticsCosts, Error> {
        let trips: TripLog = self.load().await?;
        let readings = || {
            trips.0.iter().map(|trip| {
                Reading::new(trip.vehicle.trim(), trip.started_at(), trip.odometer.value())
            })
        };
        let rate = self.settings.cost_per_km;
        Ok(LogisticsCosts {
            rate,
            monthly: period_deltas(readings(), Period::Month, rate),
            yearly: period_deltas(readings(), Period::Year, rate),
        })
    }

    /// Trips by destination bucket and by month.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn destinations(&self) -> Result<DestinationSummary, Error> {
        let trips: TripLog = self.load().await?;
        let destinations = self
            .settings
            .destination_rules
            .count(trips.0.iter().map(|trip| trip.destination.as_str()));
        let (deliveries_per_month, diagnostics) =
            count_by_month(trips.0.iter().map(|trip| trip.started_at()));
        Ok(DestinationSummary {
            destinations,
            deliveries_per_month,
            diagnostics,
        })
    }

    /// Fuel spend over the service log entries passing `filter`.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn fuel_total(&self, filter: &LogFilter) -> Result<Total, Error> {
        let log: ServiceLog = self.load().await?;
        Ok(log.fuel_total(filter))
    }

    /// Operators under quota, excluding those already called out on `date`.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn quota_callouts(&self, date: &str) -> Result<CalloutReport, Error> {
        let sheet: QuotaSheet = self.load().await?;
        let roster: DoneRoster = self.load().await?;
        Ok(callouts(&sheet, roster.names_on(date)))
    }

    /// Inventory reconciled against the warehouse movements.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn inventory(&self) -> Result<InventoryReport, Error> {
        let inventory: Inventory = self.load().await?;
        let movements: WarehouseLog = self.load().await?;
        Ok(reconcile(&inventory, &movements))
    }

    /// Machine usage and operator ranking over the quota rows in `filter`.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn machine_usage(&self, filter: &DateFilter) -> Result<MachineReport, Error> {
        let sheet: QuotaSheet = self.load().await?;
        Ok(machine_report(&sheet, filter))
    }

    /// Per-day output and delivery totals of every stored week.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn daily_totals(&self) -> Result<Vec<WeekTotals>, Error> {
        let sheet: DailySheet = self.load().await?;
        Ok(sheet.0.iter().map(week_totals).collect())
    }

    /// Warehouse movements in `filter` with their totals.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn warehouse_totals(
        &self,
        filter: &WarehouseFilter,
    ) -> Result<DepartmentTotals, Error> {
        let log: WarehouseLog = self.load().await?;
        Ok(department_totals(&log, filter))
    }
}
