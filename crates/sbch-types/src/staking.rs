//! Staking ledger records: epochs, nominations and the validator snapshot

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

/// Staking epoch as kept by the staking ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    /// Epoch number; not maintained for the epoch in progress
    pub number: i64,
    /// First main-chain height of the epoch
    pub start_height: i64,
    /// Unix time the epoch closed
    pub end_time: i64,
    /// Validator nominations counted in this epoch
    #[serde(default)]
    pub nominations: Vec<Nomination>,
}

/// Nomination count of one validator public key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nomination {
    /// Validator consensus public key
    pub pubkey: H256,
    /// Number of main-chain blocks nominating it
    pub nominated_count: i64,
}

/// Validator entry of the staking snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    /// Operator address
    pub address: H160,
    /// Consensus public key
    pub pubkey: H256,
    /// Address receiving rewards
    pub reward_to: H160,
    /// Voting power
    pub voting_power: i64,
    /// Free-form self description
    #[serde(default)]
    pub introduction: String,
    /// Staked coins
    pub staked_coins: U256,
    /// Scheduled to leave the validator set
    #[serde(default)]
    pub is_retiring: bool,
}

/// Reward not yet paid out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReward {
    /// Validator operator address
    pub address: H160,
    /// Epoch the reward was earned in
    pub epoch_num: i64,
    /// Amount owed
    pub amount: U256,
}

/// Snapshot of the validator set and staking state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorsInfo {
    /// Main-chain height staking started from
    pub genesis_main_chain_block_height: i64,
    /// Number of the epoch in progress
    pub curr_epoch_num: i64,
    /// Current validator set
    #[serde(default)]
    pub validators: Vec<Validator>,
    /// Unpaid rewards
    #[serde(default)]
    pub pending_rewards: Vec<PendingReward>,
    /// Epoch in progress
    #[serde(default)]
    pub curr_epoch: Epoch,
}
