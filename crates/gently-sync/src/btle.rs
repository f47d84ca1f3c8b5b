//! # btleplug Device Link
//!
//! [`DeviceLink`] over the host's first Bluetooth adapter.
//!
//! ## Event Plumbing
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  adapter.events() ──▶ forwarder task ──┐                               │
//! │     DeviceDisconnected(id)             │                               │
//! │                                        ▼                               │
//! │  scan() ──▶ start_scan ──▶ timer task ──▶ mpsc::Sender<LinkEvent> ──▶ engine
//! │             (returns)      sleep(d),                                   │
//! │                            stop_scan,                                  │
//! │                            ScanStopped                                 │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter as BtleScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::link::{
    DeviceLink, GattCharacteristic, LinkError, LinkEvent, LinkResult, PeripheralDescriptor,
    PeripheralId, ScanFilter,
};

/// Capacity of the link event channel.
const EVENT_BUFFER: usize = 32;

fn link_err(e: btleplug::Error) -> LinkError {
    LinkError::Message(e.to_string())
}

/// Bluetooth LE central backed by btleplug.
pub struct BtleLink {
    adapter: Adapter,
    tx: mpsc::Sender<LinkEvent>,
    rx: Mutex<Option<mpsc::Receiver<LinkEvent>>>,
    forwarder: JoinHandle<()>,
}

impl BtleLink {
    /// Opens the first adapter and starts forwarding its events.
    ///
    /// Must be called inside a Tokio runtime.
    pub async fn new() -> LinkResult<Self> {
        let manager = Manager::new().await.map_err(link_err)?;
        let adapter = manager
            .adapters()
            .await
            .map_err(link_err)?
            .into_iter()
            .next()
            .ok_or(LinkError::Unavailable)?;

        match adapter.adapter_info().await {
            Ok(info) => info!(adapter = %info, "Using Bluetooth adapter"),
            Err(e) => debug!(error = %e, "Adapter info unavailable"),
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let mut central_events = adapter.events().await.map_err(link_err)?;

        let events_tx = tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(event) = central_events.next().await {
                if let CentralEvent::DeviceDisconnected(id) = event {
                    let event = LinkEvent::Disconnected {
                        peripheral_id: PeripheralId::new(id.to_string()),
                    };
                    if events_tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            debug!("Adapter event stream ended");
        });

        Ok(BtleLink {
            adapter,
            tx,
            rx: Mutex::new(Some(rx)),
            forwarder,
        })
    }

    async fn peripheral(&self, id: &PeripheralId) -> LinkResult<Peripheral> {
        self.adapter
            .peripherals()
            .await
            .map_err(link_err)?
            .into_iter()
            .find(|p| p.id().to_string() == id.as_str())
            .ok_or_else(|| LinkError::Message(format!("Unknown peripheral {id}")))
    }
}

impl Drop for BtleLink {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

#[async_trait]
impl DeviceLink for BtleLink {
    fn events(&self) -> Option<mpsc::Receiver<LinkEvent>> {
        self.rx.lock().ok().and_then(|mut rx| rx.take())
    }

    async fn scan(&self, filter: &ScanFilter, duration: Duration) -> LinkResult<()> {
        self.adapter
            .start_scan(BtleScanFilter {
                services: filter.services.clone(),
            })
            .await
            .map_err(link_err)?;

        let adapter = self.adapter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Err(e) = adapter.stop_scan().await {
                warn!(error = %e, "Failed to stop scan");
            }
            let _ = tx.send(LinkEvent::ScanStopped).await;
        });

        Ok(())
    }

    async fn discovered(&self) -> LinkResult<Vec<PeripheralDescriptor>> {
        let peripherals = self.adapter.peripherals().await.map_err(link_err)?;
        let mut found = Vec::with_capacity(peripherals.len());

        for p in peripherals {
            let name = p
                .properties()
                .await
                .ok()
                .flatten()
                .and_then(|props| props.local_name);
            found.push(PeripheralDescriptor {
                id: PeripheralId::new(p.id().to_string()),
                name,
            });
        }

        Ok(found)
    }

    async fn connect(&self, id: &PeripheralId) -> LinkResult<()> {
        let peripheral = self.peripheral(id).await?;
        peripheral.connect().await.map_err(link_err)
    }

    async fn disconnect(&self, id: &PeripheralId) -> LinkResult<()> {
        let peripheral = self.peripheral(id).await?;
        if !peripheral.is_connected().await.map_err(link_err)? {
            return Ok(());
        }
        peripheral.disconnect().await.map_err(link_err)
    }

    async fn discover_services(&self, id: &PeripheralId) -> LinkResult<Vec<GattCharacteristic>> {
        let peripheral = self.peripheral(id).await?;
        if !peripheral.is_connected().await.map_err(link_err)? {
            return Err(LinkError::NotConnected);
        }
        peripheral.discover_services().await.map_err(link_err)?;

        Ok(peripheral
            .characteristics()
            .into_iter()
            .map(|c| GattCharacteristic {
                service: c.service_uuid,
                characteristic: c.uuid,
            })
            .collect())
    }

    async fn write_characteristic(
        &self,
        id: &PeripheralId,
        service: Uuid,
        characteristic: Uuid,
        value: &[u8],
    ) -> LinkResult<()> {
        let peripheral = self.peripheral(id).await?;
        let target = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.service_uuid == service && c.uuid == characteristic)
            .ok_or_else(|| LinkError::Message(format!("Characteristic {characteristic} not discovered")))?;

        peripheral
            .write(&target, value, WriteType::WithResponse)
            .await
            .map_err(link_err)
    }
}
