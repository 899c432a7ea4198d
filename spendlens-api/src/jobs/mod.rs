pub mod transaction_fetcher;
