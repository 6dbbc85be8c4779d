use crate::base::cookieerror::Result;
use std::collections::BTreeMap;

/// String-to-string mapping contract shared by the plain and encrypted stores.
///
/// Every read and write fails with
/// [`CookieError::NotReady`](crate::base::cookieerror::CookieError::NotReady)
/// until [`ready`](CookieMapping::ready) returns true. Writes are queued and
/// visible to reads immediately; [`save`](CookieMapping::save) pushes them
/// to the client without waiting for the next cycle.
#[allow(async_fn_in_trait)]
pub trait CookieMapping {
    fn ready(&self) -> bool;

    fn get(&self, name: &str) -> Result<Option<String>>;

    fn set(&self, name: &str, value: &str) -> Result<()>;

    fn delete(&self, name: &str) -> Result<()>;

    /// Names currently visible, sorted.
    fn names(&self) -> Result<Vec<String>>;

    fn len(&self) -> Result<usize> {
        Ok(self.names()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.names()?.iter().any(|n| n == name))
    }

    /// Every readable name/value pair. Names whose value reads as absent are skipped.
    ///
    /// The map can therefore be smaller than [`len`](CookieMapping::len).
    /// Implementations may also leave out bookkeeping cookies that
    /// [`names`](CookieMapping::names) still lists, such as the encrypted
    /// store's key-params cookie.
    fn to_map(&self) -> Result<BTreeMap<String, String>> {
        let mut map = BTreeMap::new();
        for name in self.names()? {
            if let Some(value) = self.get(&name)? {
                map.insert(name, value);
            }
        }
        Ok(map)
    }

    async fn save(&self) -> Result<()>;
}
