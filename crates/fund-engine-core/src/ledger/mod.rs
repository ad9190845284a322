pub mod capital_account;
