use crate::error::MoimError;
use crate::ledger::AccountLedger;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a group's dues are settled between members.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManagementType {
    /// Balance is split into equal per-member shares.
    Fair,
    /// Contributions form a shared fund with no individual ownership.
    Operating,
}

impl std::fmt::Display for ManagementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ManagementType::Fair => "fair",
            ManagementType::Operating => "operating",
        };
        write!(f, "{}", s)
    }
}

/// Serialized form of [`GroupAccount`]; validated on conversion.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub management_type: ManagementType,
    pub total_balance: u64,
    pub member_count: u32,
    #[serde(default)]
    pub total_deposited: u64,
    #[serde(default)]
    pub total_used: u64,
}

/// Dues account of a group. Always has at least one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord", into = "AccountRecord")]
pub struct GroupAccount {
    management_type: ManagementType,
    total_balance: u64,
    member_count: u32,
    total_deposited: u64,
    total_used: u64,
}

impl GroupAccount {
    pub fn new(
        management_type: ManagementType,
        total_balance: u64,
        member_count: u32,
    ) -> Result<Self, MoimError> {
        Self::try_from(AccountRecord {
            management_type,
            total_balance,
            member_count,
            total_deposited: total_balance,
            total_used: 0,
        })
    }

    pub fn management_type(&self) -> ManagementType {
        self.management_type
    }

    pub fn total_balance(&self) -> u64 {
        self.total_balance
    }

    pub fn member_count(&self) -> u32 {
        self.member_count
    }

    pub fn total_deposited(&self) -> u64 {
        self.total_deposited
    }

    pub fn total_used(&self) -> u64 {
        self.total_used
    }

    pub fn deposit(&mut self, amount: u64) -> Result<(), MoimError> {
        if amount == 0 {
            return Err(MoimError::InvalidAmount);
        }
        self.total_balance = checked(self.total_balance.checked_add(amount), "balance")?;
        self.total_deposited = checked(self.total_deposited.checked_add(amount), "deposits")?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<(), MoimError> {
        if amount == 0 {
            return Err(MoimError::InvalidAmount);
        }
        if amount > self.total_balance {
            return Err(MoimError::InsufficientBalance {
                requested: amount,
                available: self.total_balance,
            });
        }
        self.total_balance -= amount;
        self.total_used = checked(self.total_used.checked_add(amount), "usage")?;
        Ok(())
    }

    /// Adds one member, charging the entry fee owed at the current headcount.
    pub fn admit_member(&mut self) -> Result<u64, MoimError> {
        let fee = AccountLedger::entry_fee(self);
        let member_count = checked(self.member_count.checked_add(1), "member count")?;
        self.total_balance = checked(self.total_balance.checked_add(fee), "balance")?;
        self.total_deposited = checked(self.total_deposited.checked_add(fee), "deposits")?;
        self.member_count = member_count;
        Ok(fee)
    }

    /// Removes one member and pays out their refund. The last member stays.
    pub fn release_member(&mut self) -> Result<u64, MoimError> {
        if self.member_count <= 1 {
            return Err(MoimError::CannotRemoveLastMember);
        }
        let refund = AccountLedger::refund_amount(self);
        self.total_balance -= refund;
        self.member_count -= 1;
        Ok(refund)
    }

    pub fn set_management_type(&mut self, management_type: ManagementType) {
        self.management_type = management_type;
    }
}

fn checked<T>(value: Option<T>, what: &str) -> Result<T, MoimError> {
    value.ok_or_else(|| MoimError::InvariantViolation(format!("{} overflow", what)))
}

impl TryFrom<AccountRecord> for GroupAccount {
    type Error = MoimError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        if record.member_count == 0 {
            return Err(MoimError::InvariantViolation(
                "group account must have at least one member".to_string(),
            ));
        }
        Ok(GroupAccount {
            management_type: record.management_type,
            total_balance: record.total_balance,
            member_count: record.member_count,
            total_deposited: record.total_deposited,
            total_used: record.total_used,
        })
    }
}

impl From<GroupAccount> for AccountRecord {
    fn from(account: GroupAccount) -> Self {
        AccountRecord {
            management_type: account.management_type,
            total_balance: account.total_balance,
            member_count: account.member_count,
            total_deposited: account.total_deposited,
            total_used: account.total_used,
        }
    }
}
