//! Implementation-agnostic persistence ports for tables, players, hands,
//! actions, and rounds/bets. The hub depends only on these traits; the
//! Postgres adapter in [`postgres`] or the in-memory adapter below can
//! sit behind them interchangeably.

pub mod postgres;

use crate::domain::{Hand, PokerAction, PokerPlayer, PokerTable, RouletteBet, RouletteRound};
use crate::error::ErrorKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<PokerTable, ErrorKind>;
    async fn list(&self) -> Result<Vec<PokerTable>, ErrorKind>;
    async fn save(&self, table: &PokerTable) -> Result<(), ErrorKind>;
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn save(&self, player: &PokerPlayer) -> Result<(), ErrorKind>;
    async fn remove(&self, id: Uuid) -> Result<(), ErrorKind>;
    async fn for_table(&self, table_id: Uuid) -> Result<Vec<PokerPlayer>, ErrorKind>;
}

#[async_trait]
pub trait HandRepository: Send + Sync {
    async fn save(&self, hand: &Hand) -> Result<(), ErrorKind>;
}

#[async_trait]
pub trait ActionRepository: Send + Sync {
    async fn append(&self, action: &PokerAction) -> Result<(), ErrorKind>;
}

#[async_trait]
pub trait RouletteRepository: Send + Sync {
    async fn save_round(&self, round: &RouletteRound) -> Result<(), ErrorKind>;
    async fn save_bet(&self, bet: &RouletteBet) -> Result<(), ErrorKind>;
    async fn round(&self, round_id: Uuid) -> Result<RouletteRound, ErrorKind>;
    async fn history(&self, table_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteRound>, ErrorKind>;
    async fn bets_for_user(&self, user_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteBet>, ErrorKind>;
}

/// In-memory adapter used in tests and as a dev fallback when no
/// database is configured.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<Uuid, PokerTable>>,
    players: RwLock<HashMap<Uuid, PokerPlayer>>,
    hands: RwLock<Vec<Hand>>,
    actions: RwLock<Vec<PokerAction>>,
    rounds: RwLock<Vec<RouletteRound>>,
    bets: RwLock<Vec<RouletteBet>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> Result<PokerTable, ErrorKind> {
        self.tables
            .read()
            .expect("table lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound("table".to_string()))
    }
    async fn list(&self) -> Result<Vec<PokerTable>, ErrorKind> {
        Ok(self.tables.read().expect("table lock poisoned").values().cloned().collect())
    }
    async fn save(&self, table: &PokerTable) -> Result<(), ErrorKind> {
        self.tables
            .write()
            .expect("table lock poisoned")
            .insert(table.id, table.clone());
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn save(&self, player: &PokerPlayer) -> Result<(), ErrorKind> {
        self.players
            .write()
            .expect("player lock poisoned")
            .insert(player.id, player.clone());
        Ok(())
    }
    async fn remove(&self, id: Uuid) -> Result<(), ErrorKind> {
        self.players.write().expect("player lock poisoned").remove(&id);
        Ok(())
    }
    async fn for_table(&self, table_id: Uuid) -> Result<Vec<PokerPlayer>, ErrorKind> {
        Ok(self
            .players
            .read()
            .expect("player lock poisoned")
            .values()
            .filter(|p| p.table_id == table_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HandRepository for InMemoryStore {
    async fn save(&self, hand: &Hand) -> Result<(), ErrorKind> {
        self.hands.write().expect("hand lock poisoned").push(hand.clone());
        Ok(())
    }
}

#[async_trait]
impl ActionRepository for InMemoryStore {
    async fn append(&self, action: &PokerAction) -> Result<(), ErrorKind> {
        self.actions.write().expect("action lock poisoned").push(action.clone());
        Ok(())
    }
}

#[async_trait]
impl RouletteRepository for InMemoryStore {
    async fn save_round(&self, round: &RouletteRound) -> Result<(), ErrorKind> {
        let mut rounds = self.rounds.write().expect("round lock poisoned");
        rounds.retain(|r| r.id != round.id);
        rounds.push(round.clone());
        Ok(())
    }
    async fn save_bet(&self, bet: &RouletteBet) -> Result<(), ErrorKind> {
        let mut bets = self.bets.write().expect("bet lock poisoned");
        bets.retain(|b| b.id != bet.id);
        bets.push(bet.clone());
        Ok(())
    }

    async fn round(&self, round_id: Uuid) -> Result<RouletteRound, ErrorKind> {
        self.rounds
            .read()
            .expect("round lock poisoned")
            .iter()
            .find(|r| r.id == round_id)
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound("round".to_string()))
    }

    async fn history(&self, table_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteRound>, ErrorKind> {
        let rounds = self.rounds.read().expect("round lock poisoned");
        let mut matching: Vec<RouletteRound> = rounds.iter().filter(|r| r.table_id == table_id).cloned().collect();
        matching.sort_by_key(|r| std::cmp::Reverse(r.round_number));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn bets_for_user(&self, user_id: Uuid, limit: usize, offset: usize) -> Result<Vec<RouletteBet>, ErrorKind> {
        let bets = self.bets.read().expect("bet lock poisoned");
        let matching: Vec<RouletteBet> = bets.iter().filter(|b| b.user_id == user_id).cloned().collect();
        Ok(matching.into_iter().rev().skip(offset).take(limit).collect())
    }
}
