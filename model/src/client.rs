use crate::base_types::ClientId;

#[derive(Clone, Copy, Debug)]
pub struct Client {
    id: ClientId,
    lat: f64,
    lon: f64,
}

impl Client {
    pub fn new(id: ClientId, lat: f64, lon: f64) -> Client {
        Client { id, lat, lon }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}
