use sdk::{
    cosmwasm_ext::Response as CwResponse,
    cosmwasm_std::{Addr, Coin as CwCoin, Env, Event, Timestamp},
};

use crate::batch::Batch;

pub trait Emit
where
    Self: Sized,
{
    fn emit<K, V>(self, event_key: K, event_value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>;

    /// Specialization of [`emit`](Self::emit) for [`Timestamp`].
    fn emit_timestamp<K>(self, event_key: K, timestamp: &Timestamp) -> Self
    where
        K: Into<String>,
    {
        self.emit_to_string_value(event_key, timestamp.nanos())
    }

    /// Specialization of [`emit`](Self::emit) for values implementing [`ToString`].
    fn emit_to_string_value<K, V>(self, event_key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.emit(event_key, value.to_string())
    }

    fn emit_addr<K>(self, event_key: K, addr: &Addr) -> Self
    where
        K: Into<String>,
    {
        self.emit(event_key, addr.as_str())
    }

    /// Emit the amount and the denomination of a coin under `<key>-amount` and `<key>-denom`
    fn emit_coin<K>(self, event_key: K, coin: &CwCoin) -> Self
    where
        K: Into<String>,
    {
        let key = event_key.into();
        let amount_key = key.clone() + "-amount";
        let denom_key = key + "-denom";

        self.emit_to_string_value(amount_key, coin.amount)
            .emit(denom_key, coin.denom.as_str())
    }

    fn emit_tx_info(self, env: &Env) -> Self {
        self.emit_to_string_value("height", env.block.height)
            .emit_timestamp("at", &env.block.time)
            .emit_to_string_value(
                "idx",
                env.transaction
                    .as_ref()
                    .map(|transaction| transaction.index)
                    .unwrap_or_default(),
            )
    }
}

#[must_use]
pub struct Emitter {
    batch: Batch,
    event: Event,
}

impl Emitter {
    pub fn of_type<T>(event_type: T) -> Self
    where
        T: Into<String>,
    {
        Self::with_batch(Batch::default(), event_type)
    }

    pub fn with_batch<T>(batch: Batch, event_type: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            batch,
            event: Event::new(event_type.into()),
        }
    }
}

impl Emit for Emitter {
    fn emit<K, V>(mut self, event_key: K, event_value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.event = self.event.add_attribute(event_key, event_value);

        self
    }
}

impl From<Emitter> for CwResponse {
    fn from(emitter: Emitter) -> Self {
        Self::from(emitter.batch).add_event(emitter.event)
    }
}
