// Live, insertion-ordered particle collection. Every particle gets an id on
// the way in so a single one can be found or removed later without holding a
// reference into the vector.

use crate::particle::Particle;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticleId(u64);

#[derive(Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    ids: Vec<ParticleId>,
    next_id: u64,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, particle: Particle) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles.push(particle);
        self.ids.push(id);
        id
    }

    fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.ids.iter().position(|&other| other == id)
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.index_of(id).map(|idx| &self.particles[idx])
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.index_of(id).map(move |idx| &mut self.particles[idx])
    }

    // Keeps the draw order of everything else intact
    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let idx = self.index_of(id)?;
        self.ids.remove(idx);
        Some(self.particles.remove(idx))
    }

    /// Ids are never reused, so anything still holding one from before a
    /// clear simply stops resolving.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}
