//! Public types for the Riftwatch API.

mod dto;
mod record;

pub use dto::{
    AccountDto, ChampionMasteryDto, InfoDto, MatchDto, MetadataDto, ParticipantDto, SummonerDto,
};
pub use record::{MatchRecord, Outcome, Role, round_to};
