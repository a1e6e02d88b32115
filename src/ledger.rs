use crate::models::{GroupAccount, ManagementType};
use log::debug;
use serde::Serialize;
use utoipa::ToSchema;

/// Derived settlement figures for a group account.
///
/// Shares are floored; the remainder of `balance / members` stays in the pool
/// and ends up with the last remaining member, who can never leave.
pub struct AccountLedger;

impl AccountLedger {
    /// Equal share of the balance per current member. `None` for operating funds.
    pub fn per_person_share(account: &GroupAccount) -> Option<u64> {
        match account.management_type() {
            ManagementType::Fair => {
                Some(account.total_balance() / u64::from(account.member_count()))
            }
            ManagementType::Operating => None,
        }
    }

    /// What a new member pays to buy into an equal share.
    pub fn entry_fee(account: &GroupAccount) -> u64 {
        let fee = Self::per_person_share(account).unwrap_or(0);
        debug!(
            "Entry fee for {} account with {} members: {}",
            account.management_type(),
            account.member_count(),
            fee
        );
        fee
    }

    /// What a departing member gets back. Operating funds never refund.
    pub fn refund_amount(account: &GroupAccount) -> u64 {
        Self::per_person_share(account).unwrap_or(0)
    }

    /// Rounding residue retained in the pool.
    pub fn share_remainder(account: &GroupAccount) -> u64 {
        match account.management_type() {
            ManagementType::Fair => account.total_balance() % u64::from(account.member_count()),
            ManagementType::Operating => 0,
        }
    }

    pub fn account_view(account: &GroupAccount) -> AccountView {
        let (per_person_share, entry_fee, total_used) = match account.management_type() {
            ManagementType::Fair => (
                Self::per_person_share(account),
                Some(Self::entry_fee(account)),
                None,
            ),
            ManagementType::Operating => (None, None, Some(account.total_used())),
        };
        AccountView {
            management_type: account.management_type(),
            total_balance: account.total_balance(),
            member_count: account.member_count(),
            per_person_share,
            entry_fee,
            total_deposited: Some(account.total_deposited()),
            total_used,
        }
    }
}

/// Account figures as shown to group members.
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub management_type: ManagementType,
    pub total_balance: u64,
    pub member_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_person_share: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deposited: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_used: Option<u64>,
}
