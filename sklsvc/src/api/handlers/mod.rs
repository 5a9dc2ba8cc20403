pub mod avatars;
pub mod submissions;
pub mod withdrawals;
