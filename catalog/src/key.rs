/// Canonical lookup key for an effect combination.
///
/// Built by sorting the effect ids ascending. Duplicates are kept: the shop
/// catalog contains combinations where the same effect appears more than once,
/// so the key is a sorted multiset, not a set. Two inputs that differ only in
/// order produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectKey(Vec<u32>);

impl EffectKey {
	pub fn new(effect_ids: &[u32]) -> Self {
		let mut ids = effect_ids.to_vec();
		ids.sort_unstable();
		Self(ids)
	}

	pub fn ids(&self) -> &[u32] {
		&self.0
	}
}

impl From<Vec<u32>> for EffectKey {
	fn from(mut ids: Vec<u32>) -> Self {
		ids.sort_unstable();
		Self(ids)
	}
}
