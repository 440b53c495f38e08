// ═══════════════════════════════════════════════════════════════════
// Integration Tests: TradingSimulator facade end to end
// ═══════════════════════════════════════════════════════════════════

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stock_sim_core::errors::CoreError;
use stock_sim_core::models::market::Market;
use stock_sim_core::models::settings::Settings;
use stock_sim_core::models::transaction::TransactionKind;
use stock_sim_core::providers::random_walk::RandomWalk;
use stock_sim_core::providers::scripted::ScriptedWalk;
use stock_sim_core::TradingSimulator;

/// Default settings, default listing, prices only move when scripted.
fn simulator(steps: Vec<Decimal>) -> TradingSimulator {
    TradingSimulator::with_parts(
        Settings::default(),
        Market::default_listing(),
        Box::new(ScriptedWalk::new(steps)),
    )
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn new_uses_settings() {
        let settings = Settings {
            starting_balance: dec!(2500),
            price_floor: dec!(2),
            ..Settings::default()
        };
        let sim = TradingSimulator::new(settings).unwrap();
        assert_eq!(sim.balance(), dec!(2500));
        assert_eq!(sim.market().len(), 4);
        assert_eq!(sim.market().price_floor(), dec!(2));
        assert_eq!(sim.transaction_count(), 0);
        assert!(!sim.has_unsaved_changes());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            price_floor: dec!(-1),
            ..Settings::default()
        };
        let err = TradingSimulator::new(settings).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn debug_summarizes_state() {
        let sim = simulator(vec![]);
        let debug = format!("{sim:?}");
        assert!(debug.contains("TradingSimulator"));
        assert!(debug.contains("dirty"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trading through the facade
// ═══════════════════════════════════════════════════════════════════

mod trading {
    use super::*;

    #[test]
    fn full_scenario_with_price_move() {
        // AAPL 150.00 → 160.00 after one tick
        let mut sim = simulator(vec![dec!(10.00)]);

        sim.buy("AAPL", 10).unwrap();
        assert_eq!(sim.balance(), dec!(8500.00));
        assert_eq!(sim.holding("AAPL"), 10);

        sim.tick();
        assert_eq!(sim.find_stock("AAPL").unwrap().price(), dec!(160.00));

        sim.sell("aapl", 4).unwrap();
        assert_eq!(sim.balance(), dec!(9140.00));
        assert_eq!(sim.holding("AAPL"), 6);

        let v = sim.valuation().unwrap();
        assert_eq!(v.total_value, dec!(10100.00));
        assert!(sim.reconcile().is_ok());
    }

    #[test]
    fn unknown_symbol_is_not_found() {
        let mut sim = simulator(vec![]);
        let err = sim.buy("MSFT", 1).unwrap_err();
        assert!(matches!(err, CoreError::StockNotFound(_)));
        let err = sim.sell("MSFT", 1).unwrap_err();
        assert!(matches!(err, CoreError::StockNotFound(_)));
        assert!(!sim.has_unsaved_changes());
    }

    #[test]
    fn sell_never_bought_symbol() {
        let mut sim = simulator(vec![]);
        let err = sim.sell("TSLA", 5).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientShares { held: 0, .. }));
        assert_eq!(sim.balance(), dec!(10000.00));
        assert!(sim.holdings().is_empty());
        assert!(sim.transaction_log().is_empty());
    }

    #[test]
    fn insufficient_funds_leaves_no_trace() {
        let mut sim = simulator(vec![]);
        let err = sim.buy("AMZN", 4).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
        assert_eq!(sim.balance(), dec!(10000.00));
        assert_eq!(sim.transaction_count(), 0);
        assert!(!sim.has_unsaved_changes());
    }

    #[test]
    fn transaction_log_keeps_execution_order() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 2).unwrap();
        sim.buy("TSLA", 1).unwrap();
        sim.sell("AAPL", 1).unwrap();

        let log = sim.transaction_log();
        let kinds: Vec<(TransactionKind, &str)> =
            log.iter().map(|t| (t.kind(), t.symbol())).collect();
        assert_eq!(
            kinds,
            vec![
                (TransactionKind::Buy, "AAPL"),
                (TransactionKind::Buy, "TSLA"),
                (TransactionKind::Sell, "AAPL"),
            ]
        );
        assert_eq!(
            log[0].to_string(),
            "BUY 2 shares of AAPL at $150.00 | Total: $300.00"
        );
        assert!(log[0].executed_at() <= log[2].executed_at());
    }

    #[test]
    fn trade_marks_dirty() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 1).unwrap();
        assert!(sim.has_unsaved_changes());
    }

    #[test]
    fn random_session_reconciles() {
        let mut sim = TradingSimulator::with_parts(
            Settings::default(),
            Market::default_listing(),
            Box::new(RandomWalk::seeded(5, dec!(5))),
        )
        .unwrap();

        for round in 0..200u64 {
            sim.tick();
            let symbol = ["AAPL", "GOOGL", "TSLA", "AMZN"][(round % 4) as usize];
            let _ = if round % 3 == 0 {
                sim.sell(symbol, round % 5 + 1)
            } else {
                sim.buy(symbol, round % 3 + 1)
            };
            sim.reconcile().unwrap();
            assert!(sim.market().stocks().iter().all(|s| s.price() >= dec!(1)));
        }
        assert_eq!(sim.ticks(), 200);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Save / Load
// ═══════════════════════════════════════════════════════════════════

mod persistence {
    use super::*;

    #[test]
    fn save_then_load_into_fresh_simulator() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 10).unwrap();
        sim.buy("TSLA", 3).unwrap();
        let text = sim.save_to_string();
        assert!(!sim.has_unsaved_changes());

        let mut other = simulator(vec![]);
        other.load_from_str(&text).unwrap();

        assert_eq!(other.balance(), sim.balance());
        assert_eq!(other.holdings(), sim.holdings());
        assert!(other.transaction_log().is_empty());
        assert!(other.reconcile().is_ok());
    }

    #[test]
    fn bad_balance_line_leaves_state_unchanged() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 1).unwrap();
        let balance = sim.balance();
        let holdings = sim.holdings().clone();

        let err = sim.load_from_str("abc\nAAPL,99\n").unwrap_err();

        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
        assert_eq!(sim.balance(), balance);
        assert_eq!(sim.holdings(), &holdings);
        assert!(sim.has_unsaved_changes());
    }

    #[test]
    fn bad_holding_line_leaves_state_unchanged() {
        let mut sim = simulator(vec![]);
        let err = sim.load_from_str("50\nAAPL,1\nTSLA\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
        assert_eq!(sim.balance(), dec!(10000.00));
        assert!(sim.holdings().is_empty());
    }

    #[test]
    fn load_keeps_session_history() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 1).unwrap();
        sim.load_from_str("42.00\nGOOGL,2\n").unwrap();

        assert_eq!(sim.balance(), dec!(42.00));
        assert_eq!(sim.holding("GOOGL"), 2);
        assert_eq!(sim.holding("AAPL"), 0);
        assert_eq!(sim.transaction_count(), 1);
        assert!(sim.reconcile().is_ok());
    }

    #[test]
    fn file_roundtrip_via_settings_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.txt");
        let settings = Settings {
            snapshot_path: path.to_string_lossy().into_owned(),
            ..Settings::default()
        };

        let mut sim = TradingSimulator::with_parts(
            settings.clone(),
            Market::default_listing(),
            Box::new(ScriptedWalk::flat()),
        )
        .unwrap();
        sim.buy("GOOGL", 2).unwrap();
        sim.save().unwrap();
        assert!(!sim.has_unsaved_changes());

        let mut restored = TradingSimulator::with_parts(
            settings,
            Market::default_listing(),
            Box::new(ScriptedWalk::flat()),
        )
        .unwrap();
        restored.load().unwrap();

        assert_eq!(restored.balance(), dec!(4400.00));
        assert_eq!(restored.holding("GOOGL"), 2);
    }

    #[test]
    fn load_missing_file_is_io_error_and_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = simulator(vec![]);
        let err = sim.load_from_file(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
        assert_eq!(sim.balance(), dec!(10000.00));
    }

    #[test]
    fn restored_holding_can_be_sold() {
        let mut sim = simulator(vec![]);
        sim.load_from_str("0\ntsla,2\n").unwrap();
        sim.sell("TSLA", 2).unwrap();
        assert_eq!(sim.balance(), dec!(1400.00));
        assert!(sim.holdings().is_empty());
        assert!(sim.reconcile().is_ok());
    }

    #[test]
    fn string_and_file_loads_behave_alike() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        std::fs::write(&good, "75.50\nAMZN,1\n").unwrap();
        std::fs::write(&bad, "75.50\nAMZN,0\n").unwrap();

        let mut from_str = simulator(vec![]);
        let mut from_file = simulator(vec![]);
        from_str.buy("AAPL", 1).unwrap();
        from_file.buy("AAPL", 1).unwrap();

        let str_err = from_str.load_from_str("75.50\nAMZN,0\n").unwrap_err();
        let file_err = from_file.load_from_file(&bad).unwrap_err();
        assert_eq!(str_err.to_string(), file_err.to_string());
        assert!(from_str.has_unsaved_changes());
        assert!(from_file.has_unsaved_changes());

        from_str.load_from_str("75.50\nAMZN,1\n").unwrap();
        from_file.load_from_file(&good).unwrap();
        assert_eq!(from_str.balance(), from_file.balance());
        assert_eq!(from_str.holdings(), from_file.holdings());
        assert!(!from_str.has_unsaved_changes());
        assert!(!from_file.has_unsaved_changes());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Valuation & Export
// ═══════════════════════════════════════════════════════════════════

mod reporting {
    use super::*;

    #[test]
    fn valuation_excludes_unlisted_holdings() {
        let mut sim = simulator(vec![]);
        sim.load_from_str("100\nAAPL,1\nGONE,5\n").unwrap();
        let v = sim.valuation().unwrap();
        assert_eq!(v.total_value, dec!(250.00));
        assert_eq!(v.unpriced_symbols, vec!["GONE".to_string()]);
    }

    #[test]
    fn oversized_snapshot_valuation_is_an_error() {
        let mut sim = simulator(vec![]);
        sim.load_from_str("79228162514264337593543950335\nAAPL,1\n").unwrap();
        assert!(matches!(sim.valuation(), Err(CoreError::ValidationError(_))));
        assert!(sim.to_json().is_err());
    }

    #[test]
    fn empty_history_exports() {
        let sim = simulator(vec![]);
        assert_eq!(sim.export_history_to_json().unwrap().trim(), "[]");
        assert_eq!(
            sim.export_history_to_csv(),
            "id,kind,symbol,unit_price,quantity,total,executed_at\n"
        );
    }

    #[test]
    fn history_json_contains_trades() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 3).unwrap();
        let json = sim.export_history_to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &parsed[0];
        assert_eq!(first["kind"], "Buy");
        assert_eq!(first["symbol"], "AAPL");
        assert_eq!(first["quantity"], 3);
    }

    #[test]
    fn history_csv_has_one_row_per_trade() {
        let mut sim = simulator(vec![]);
        sim.buy("AAPL", 3).unwrap();
        sim.sell("AAPL", 1).unwrap();
        let csv = sim.export_history_to_csv();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains(",BUY,AAPL,150.00,3,450.00,"));
        assert!(rows[2].contains(",SELL,AAPL,150.00,1,150.00,"));
    }

    #[test]
    fn to_json_includes_portfolio_and_valuation() {
        let mut sim = simulator(vec![]);
        sim.buy("TSLA", 1).unwrap();
        let json = sim.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["portfolio"]["holdings"]["TSLA"].is_number());
        assert!(parsed["valuation"]["total_value"].is_string());
        assert_eq!(parsed["portfolio"]["history"].as_array().unwrap().len(), 1);
    }
}
