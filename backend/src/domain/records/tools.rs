//! Tool crib: lendable tools, return history and the damaged list.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CollectionDocument, DialogError, EditKind, Mutation, MutationError, Prompt,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lending status of a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolStatus {
    /// On the shelf.
    #[default]
    Available,
    /// Lent out.
    Borrowed,
    /// Returned damaged.
    Damaged,
    /// Returned broken.
    Broken,
    /// Reported stolen.
    Stolen,
    /// Written off, awaiting a replacement memo.
    #[serde(rename = "REPLACE/MEMO")]
    ReplaceMemo,
}

/// Condition reported when a borrowed tool comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnCondition {
    /// Fit for lending again.
    Good,
    /// Needs repair.
    Damaged,
    /// Beyond repair.
    Broken,
    /// Not returned.
    Stolen,
}

impl ReturnCondition {
    const fn damaged_status(self) -> Option<ToolStatus> {
        match self {
            Self::Good => None,
            Self::Damaged => Some(ToolStatus::Damaged),
            Self::Broken => Some(ToolStatus::Broken),
            Self::Stolen => Some(ToolStatus::Stolen),
        }
    }
}

impl FromStr for ReturnCondition {
    type Err = DialogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "damaged" => Ok(Self::Damaged),
            "broken" => Ok(Self::Broken),
            "stolen" => Ok(Self::Stolen),
            _ => Err(DialogError::invalid_answer(
                "Invalid condition. Please enter Good, Damaged, Broken, or Stolen.",
            )),
        }
    }
}

/// A lendable tool, keyed by serial number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    /// Tool name.
    pub tool_name: String,
    /// Size label.
    pub size: String,
    /// Serial number, unique across the crib.
    pub serial: String,
    /// Model.
    pub model: String,
    /// Brand.
    pub brand: String,
    /// Owning department.
    pub department: String,
    /// Condition noted at registration or after repair.
    pub tool_condition: String,
    /// Lending status.
    pub status: ToolStatus,
    /// Current borrower.
    pub borrowed_by: String,
    /// Lending date.
    pub borrowed_on: String,
    /// Return date.
    pub return_date: String,
}

impl Tool {
    fn reset_to_shelf(&mut self) {
        self.status = ToolStatus::Available;
        "Good".clone_into(&mut self.tool_condition);
        self.borrowed_by.clear();
        self.borrowed_on.clear();
        self.return_date.clear();
    }
}

/// A completed loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReturn {
    /// Tool as it was when returned.
    #[serde(flatten)]
    pub tool: Tool,
    /// Reported condition.
    pub condition: ReturnCondition,
}

/// A tool taken out of circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagedTool {
    /// Tool as it was when withdrawn.
    #[serde(flatten)]
    pub tool: Tool,
    /// Why it was withdrawn.
    pub return_condition: ToolStatus,
}

/// The `tools` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolInventory {
    /// Tools in circulation.
    pub tools: Vec<Tool>,
    /// Completed loans, oldest first.
    pub history: Vec<ToolReturn>,
    /// Tools withdrawn after a bad return.
    pub damaged: Vec<DamagedTool>,
}

impl CollectionDocument for ToolInventory {
    const NAME: &'static str = "tools";
    const FILE_NAME: &'static str = "tools.json";
}

impl ToolInventory {
    /// Tool in circulation with `serial`.
    #[must_use]
    pub fn tool(&self, serial: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.serial == serial)
    }

    fn tool_mut(&mut self, serial: &str) -> Result<&mut Tool, MutationError> {
        self.tools
            .iter_mut()
            .find(|tool| tool.serial == serial)
            .ok_or_else(|| not_found(serial))
    }

    fn damaged_index(&self, serial: &str) -> Result<usize, MutationError> {
        self.damaged
            .iter()
            .position(|entry| entry.tool.serial == serial)
            .ok_or_else(|| not_found(serial))
    }
}

fn not_found(serial: &str) -> MutationError {
    MutationError::NotFound {
        what: "tool",
        key: serial.to_owned(),
    }
}

/// Edits to the tool crib. All of them are saved immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolMutation {
    /// Register a tool; the serial must be new.
    Register(Tool),
    /// Lend an available tool.
    Borrow {
        /// Tool serial.
        serial: String,
        /// Borrower name.
        borrower: String,
        /// Lending date.
        on: NaiveDate,
    },
    /// Take a borrowed tool back.
    Return {
        /// Tool serial.
        serial: String,
        /// Reported condition.
        condition: ReturnCondition,
        /// Return date.
        on: NaiveDate,
    },
    /// Put a repaired tool back in circulation.
    Repair {
        /// Tool serial.
        serial: String,
    },
    /// Mark a withdrawn tool for replacement.
    MarkForReplacement {
        /// Tool serial.
        serial: String,
    },
    /// Remove a tool from circulation.
    Delete {
        /// Tool serial.
        serial: String,
    },
    /// Replace the tools in circulation, keeping history and damaged lists.
    ReplaceCirculation(Vec<Tool>),
}

impl Mutation<ToolInventory> for ToolMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut ToolInventory) -> Result<(), MutationError> {
        match self {
            Self::Register(tool) => register(document, tool),
            Self::Borrow {
                serial,
                borrower,
                on,
            } => {
                let borrower = borrower.trim();
                if borrower.is_empty() {
                    return Err(MutationError::invalid("a borrower name is required"));
                }
                let tool = document.tool_mut(&serial)?;
                if tool.status != ToolStatus::Available {
                    return Err(MutationError::invalid(format!(
                        "tool {serial} is not available"
                    )));
                }
                tool.status = ToolStatus::Borrowed;
                borrower.clone_into(&mut tool.borrowed_by);
                tool.borrowed_on = on.format(DATE_FORMAT).to_string();
                Ok(())
            }
            Self::Return {
                serial,
                condition,
                on,
            } => return_tool(document, &serial, condition, on),
            Self::Repair { serial } => {
                let index = document.damaged_index(&serial)?;
                let mut tool = document.damaged.remove(index).tool;
                tool.reset_to_shelf();
                document.tools.push(tool);
                Ok(())
            }
            Self::MarkForReplacement { serial } => {
                let index = document.damaged_index(&serial)?;
                if let Some(entry) = document.damaged.get_mut(index) {
                    entry.tool.status = ToolStatus::ReplaceMemo;
                    entry.return_condition = ToolStatus::ReplaceMemo;
                }
                Ok(())
            }
            Self::Delete { serial } => {
                let before = document.tools.len();
                document.tools.retain(|tool| tool.serial != serial);
                if document.tools.len() == before {
                    return Err(not_found(&serial));
                }
                Ok(())
            }
            Self::ReplaceCirculation(tools) => {
                let mut seen: Vec<&str> = Vec::with_capacity(tools.len());
                for tool in &tools {
                    let serial = tool.serial.trim();
                    let withdrawn = document
                        .damaged
                        .iter()
                        .any(|entry| entry.tool.serial == serial);
                    if seen.contains(&serial) || withdrawn {
                        return Err(MutationError::Duplicate {
                            what: "tool",
                            key: serial.to_owned(),
                        });
                    }
                    seen.push(serial);
                }
                document.tools = tools;
                Ok(())
            }
        }
    }
}

fn register(document: &mut ToolInventory, mut tool: Tool) -> Result<(), MutationError> {
    tool.serial = tool.serial.trim().to_owned();
    if tool.serial.is_empty() {
        return Err(MutationError::invalid("a serial number is required"));
    }
    let taken = document.tool(&tool.serial).is_some()
        || document
            .damaged
            .iter()
            .any(|entry| entry.tool.serial == tool.serial);
    if taken {
        return Err(MutationError::Duplicate {
            what: "tool",
            key: tool.serial,
        });
    }
    tool.status = ToolStatus::Available;
    tool.borrowed_by.clear();
    tool.borrowed_on.clear();
    tool.return_date.clear();
    document.tools.push(tool);
    Ok(())
}

fn return_tool(
    document: &mut ToolInventory,
    serial: &str,
    condition: ReturnCondition,
    on: NaiveDate,
) -> Result<(), MutationError> {
    let returned_on = on.format(DATE_FORMAT).to_string();
    let tool = document.tool_mut(serial)?;
    if tool.status != ToolStatus::Borrowed {
        return Err(MutationError::invalid(format!(
            "tool {serial} is not borrowed"
        )));
    }
    let mut record = tool.clone();
    record.return_date.clone_from(&returned_on);

    match condition.damaged_status() {
        None => tool.reset_to_shelf(),
        Some(status) => {
            let mut withdrawn = record.clone();
            withdrawn.status = status;
            document.tools.retain(|candidate| candidate.serial != serial);
            document.damaged.push(DamagedTool {
                tool: withdrawn,
                return_condition: status,
            });
        }
    }
    document.history.push(ToolReturn {
        tool: record,
        condition,
    });
    Ok(())
}

/// Questions asked when an operator changes a tool's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPrompt {
    /// Who is borrowing the tool?
    Borrow {
        /// Tool serial.
        serial: String,
        /// Lending date.
        on: NaiveDate,
    },
    /// In what condition did the tool come back?
    Return {
        /// Tool serial.
        serial: String,
        /// Return date.
        on: NaiveDate,
    },
}

impl ToolPrompt {
    /// Prompt required to move `tool` to `requested`, if any.
    #[must_use]
    pub fn for_status_change(tool: &Tool, requested: ToolStatus, today: NaiveDate) -> Option<Self> {
        match (tool.status, requested) {
            (ToolStatus::Available, ToolStatus::Borrowed) => Some(Self::Borrow {
                serial: tool.serial.clone(),
                on: today,
            }),
            (ToolStatus::Borrowed, ToolStatus::Available) => Some(Self::Return {
                serial: tool.serial.clone(),
                on: today,
            }),
            _ => None,
        }
    }
}

impl Prompt for ToolPrompt {
    type Output = ToolMutation;

    fn question(&self) -> String {
        match self {
            Self::Borrow { .. } => "Enter name of the borrower:".to_owned(),
            Self::Return { .. } => {
                "Enter condition upon return (Good, Damaged, Broken, Stolen):".to_owned()
            }
        }
    }

    fn resolve(&self, answer: &str) -> Result<ToolMutation, DialogError> {
        match self {
            Self::Borrow { serial, on } => Ok(ToolMutation::Borrow {
                serial: serial.clone(),
                borrower: answer.trim().to_owned(),
                on: *on,
            }),
            Self::Return { serial, on } => Ok(ToolMutation::Return {
                serial: serial.clone(),
                condition: answer.parse()?,
                on: *on,
            }),
        }
    }
}
