//! End-to-end pipeline tests: raw frames through codec and session.
//!
//! Drives the same codec/session pairing the feed tasks use, with
//! injected timestamps so runs are deterministic.

use bandwatch_core::{BreakoutKind, Side};
use bandwatch_feed::{CoincheckTradeCodec, FeedEvent, ZaifBookCodec};
use bandwatch_session::{OrderBookSession, SessionConfig, TradeSession};
use chrono::{DateTime, TimeZone, Utc};

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn trade_frame(id: u64, price: &str, volume: &str, side: &str) -> String {
    format!(r#"[{id}, "btc_jpy", "{price}", "{volume}", "{side}"]"#)
}

fn depth_frame(ask: (f64, f64), bid: (f64, f64)) -> String {
    format!(
        r#"{{"asks": [[{}, {}]], "bids": [[{}, {}]]}}"#,
        ask.0, ask.1, bid.0, bid.1
    )
}

#[test]
fn trade_frames_drive_the_single_series_session() {
    let codec = CoincheckTradeCodec::new("btc_jpy-trades");
    let mut session = TradeSession::new(SessionConfig::default());
    let mut breakouts = Vec::new();

    // 11 flat trades arm the gate, the 12th spikes.
    for i in 0..11u64 {
        let frame = trade_frame(i, "100000.0", "1.0", "buy");
        let FeedEvent::Trade {
            price,
            volume,
            side,
        } = codec.decode(&frame).unwrap()
        else {
            panic!("trade codec produced a non-trade event");
        };
        assert_eq!(side, Side::Buy);
        if let Some(ev) = session.on_trade(ts(i as i64), price, volume, side).unwrap() {
            breakouts.push(ev);
        }
    }
    assert!(breakouts.is_empty());

    let frame = trade_frame(11, "200000.0", "2.5", "sell");
    let FeedEvent::Trade {
        price,
        volume,
        side,
    } = codec.decode(&frame).unwrap()
    else {
        panic!("trade codec produced a non-trade event");
    };
    let ev = session
        .on_trade(ts(60), price, volume, side)
        .unwrap()
        .expect("spike breaks the upper band");
    assert_eq!(ev.kind, BreakoutKind::UpperBreak);
    assert_eq!(ev.price.to_f64(), 200000.0);
}

#[test]
fn malformed_frames_are_rejected_before_the_session() {
    let codec = CoincheckTradeCodec::new("btc_jpy-trades");
    assert!(codec.decode("garbage").is_err());
    assert!(codec.decode(r#"{"ping": 1}"#).is_err());
    assert!(codec.decode(r#"[1, "btc_jpy"]"#).is_err());
}

#[test]
fn depth_frames_drive_the_dual_series_session() {
    let codec = ZaifBookCodec::new();
    let mut session = OrderBookSession::new(SessionConfig::default());
    let mut breakouts = Vec::new();

    // Walk both sides with pairs that change in price and volume so
    // the dedup filter passes, then crash the ask through its band.
    for i in 0..12i64 {
        let ask = (148_700.0 + (i % 2) as f64, 1.0 + i as f64);
        let bid = (148_600.0 - (i % 2) as f64, 1.0 + i as f64);
        let FeedEvent::BookTop {
            ask_price,
            ask_volume,
            bid_price,
            bid_volume,
        } = codec.decode(&depth_frame(ask, bid)).unwrap()
        else {
            panic!("book codec produced a non-book event");
        };
        breakouts.extend(
            session
                .on_book(ts(i), ask_price, ask_volume, bid_price, bid_volume)
                .unwrap(),
        );
    }
    // Bid side reports unconditionally once armed (reference behavior).
    assert!(breakouts
        .iter()
        .all(|ev| ev.kind == BreakoutKind::UpperBreak));

    let FeedEvent::BookTop {
        ask_price,
        ask_volume,
        bid_price,
        bid_volume,
    } = codec
        .decode(&depth_frame((140_000.0, 50.0), (148_600.0, 1.0)))
        .unwrap()
    else {
        panic!("book codec produced a non-book event");
    };
    let events = session
        .on_book(ts(60), ask_price, ask_volume, bid_price, bid_volume)
        .unwrap();
    assert!(events
        .iter()
        .any(|ev| ev.kind == BreakoutKind::LowerBreak
            && ev.side == Some(bandwatch_core::BookSide::Ask)));
}

#[test]
fn replaying_identical_frames_is_deterministic() {
    let codec = ZaifBookCodec::new();
    let frames: Vec<String> = (0..30)
        .map(|i| {
            depth_frame(
                (148_700.0 + (i * 3 % 11) as f64, 1.0 + (i * 7 % 5) as f64),
                (148_600.0 - (i * 2 % 7) as f64, 1.0 + (i * 5 % 9) as f64),
            )
        })
        .collect();

    let run = |frames: &[String]| {
        let mut session = OrderBookSession::new(SessionConfig::default());
        let mut events = Vec::new();
        for (i, frame) in frames.iter().enumerate() {
            let FeedEvent::BookTop {
                ask_price,
                ask_volume,
                bid_price,
                bid_volume,
            } = codec.decode(frame).unwrap()
            else {
                panic!("book codec produced a non-book event");
            };
            events.extend(
                session
                    .on_book(ts(i as i64), ask_price, ask_volume, bid_price, bid_volume)
                    .unwrap(),
            );
        }
        events
    };

    assert_eq!(run(&frames), run(&frames));
}
