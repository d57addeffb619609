//! Partition records by account number

use crate::record::{DisconnectionRecord, ServiceLineType};
use std::collections::BTreeMap;

/// All in-scope records of one account, with the pairing flags derived once
#[derive(Debug, Clone)]
pub struct AccountGroup<'a> {
    pub account_id: &'a str,
    pub records: Vec<&'a DisconnectionRecord>,
    /// Copper access bearer and copper TV removed on the same account
    pub has_paired_copper: bool,
    /// Fiber access bearer and fiber TV removed on the same account
    pub has_paired_fiber: bool,
}

impl<'a> AccountGroup<'a> {
    pub fn new(account_id: &'a str, records: Vec<&'a DisconnectionRecord>) -> Self {
        let has = |kind: &ServiceLineType| records.iter().any(|r| &r.service_line_type == kind);

        let has_paired_copper = has(&ServiceLineType::InfraCopper) && has(&ServiceLineType::ServiceCopper);
        let has_paired_fiber = has(&ServiceLineType::InfraFiber) && has(&ServiceLineType::ServiceFiber);

        Self {
            account_id,
            records,
            has_paired_copper,
            has_paired_fiber,
        }
    }

    /// Raw number of member records, OTHER lines included
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// Group records by account number
///
/// Groups come back ordered by account number; callers must not rely on the order
/// for anything but stable output.
pub fn group_by_account<'a, I>(records: I) -> Vec<AccountGroup<'a>>
where
    I: IntoIterator<Item = &'a DisconnectionRecord>,
{
    let mut by_account: BTreeMap<&'a str, Vec<&'a DisconnectionRecord>> = BTreeMap::new();
    for record in records {
        by_account.entry(record.account_id.as_str()).or_default().push(record);
    }

    by_account
        .into_iter()
        .map(|(account_id, members)| AccountGroup::new(account_id, members))
        .collect()
}
