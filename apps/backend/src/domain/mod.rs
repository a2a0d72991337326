pub mod cards;
pub mod deck;
pub mod pile;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests_deck;
#[cfg(test)]
mod tests_state;
