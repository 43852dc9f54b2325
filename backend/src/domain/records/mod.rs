//! Typed records, one module per department page.
//!
//! Every document type implements [`CollectionDocument`] and has a matching
//! mutation enum describing the edits its page can make.
//!
//! [`CollectionDocument`]: crate::domain::CollectionDocument

mod absences;
mod assignments;
mod daily;
mod employees;
mod fleet;
mod inventory;
mod leave;
mod machining;
mod offenses;
mod payroll;
mod quota;
mod resigned;
mod schedule;
mod service_log;
mod service_requests;
mod todo;
mod tools;
mod trips;

pub use absences::{
    ABSENCE_ACTIONS, Absence, AbsenceBook, AbsenceMutation, ManagerCodes, PENDING_ACTION,
    inclusive_days,
};
pub use assignments::{
    Assignment, AssignmentField, AssignmentHistory, AssignmentMutation, AssignmentRecord,
    AssignmentRoster, HISTORY_TIMESTAMP_FORMAT, HistoryFilter, days_between,
};
pub use daily::{
    DELIVERY_TOTAL_LABEL, DailyMutation, DailyRow, DailySheet, DailyWeek, Inspection,
    OUTPUT_TOTAL_LABEL, STATUS_GOOD, STATUS_NOT_GOOD, WEEK_DAYS, day_value,
};
pub use employees::{Employee, EmployeeDirectory, EmployeeMutation, NOT_APPLICABLE, new_employee_id};
pub use fleet::{Driver, Fleet, FleetMutation, Vehicle, VehicleField};
pub use inventory::{
    Inventory, InventoryItem, MovementKind, StockMovement, WarehouseLog, WarehouseMutation,
};
pub use leave::{ANNUAL_ALLOWANCE, LeaveCredit, LeaveLedger, LeaveMutation, LeavePeriod, is_tenured};
pub use machining::{JOB_DONE, MachineGroup, MachiningBoard, MachiningJob, MachiningMutation};
pub use offenses::{Offense, OffenseBook, OffenseFile, OffenseMutation};
pub use payroll::{
    Payroll, PayrollField, PayrollFilter, PayrollMutation, PayrollRecord, PayrollSubmission,
    UNKNOWN_DEPARTMENT,
};
pub use quota::{
    DoneRoster, HOURS_PER_SHIFT, QuotaEntry, QuotaMutation, QuotaSheet, QuotaTextField, Shift,
};
pub use resigned::{ClearanceField, ResignedEmployee, ResignedMutation, ResignedRoster};
pub use schedule::{Booking, ScheduleMutation, VehicleSchedule};
pub use service_log::{LogFilter, ServiceEntry, ServiceField, ServiceLog, ServiceLogMutation};
pub use service_requests::{ServiceRequest, ServiceRequestMutation, ServiceRequests};
pub use todo::{Task, TodoList, TodoMutation, TodoRequest};
pub use tools::{
    DamagedTool, ReturnCondition, Tool, ToolInventory, ToolMutation, ToolPrompt, ToolReturn,
    ToolStatus,
};
pub use trips::{Trip, TripField, TripLog, TripMutation};
