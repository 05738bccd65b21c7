use proptest::prelude::*;
use serde_json::json;

use rust_adx_rx::adapters::rx::RxAdapter;
use rust_adx_rx::adapters::{Bidder, ResponseData};
use rust_adx_rx::errors::ErrorKind;
use rust_adx_rx::openrtb::request::{Banner, BidRequest, Format, Imp};

/// 生成一个 imp：`valid` 为 false 时 ext 无法解析
fn imp_strategy(index: usize) -> impl Strategy<Value = (Imp, bool)> {
    (100..1000i32, 50..600i32, 0..10_000i64, any::<bool>()).prop_map(move |(w, h, adspot, valid)| {
        let ext = if valid {
            json!({"bidder": {"adspot_id": adspot}})
        } else {
            json!({"bidder": {"adspot_id": "bad"}})
        };
        let imp = Imp {
            id: format!("imp-{}", index),
            banner: Some(Banner {
                format: vec![Format::new(w, h)],
                ..Default::default()
            }),
            ext: Some(ext),
            ..Default::default()
        };
        (imp, valid)
    })
}

fn request_strategy() -> impl Strategy<Value = (BidRequest, Vec<bool>)> {
    (0..6usize)
        .prop_flat_map(|k| (0..k).map(imp_strategy).collect::<Vec<_>>())
        .prop_map(|imps| {
            let (imps, validity): (Vec<Imp>, Vec<bool>) = imps.into_iter().unzip();
            let request = BidRequest {
                id: "prop-request".to_string(),
                imp: imps,
                device: Some(json!({"ua": "proptest", "ip": "127.0.0.1"})),
                user: Some(json!({"id": "u-1"})),
                ..Default::default()
            };
            (request, validity)
        })
}

proptest! {
    #[test]
    fn one_request_per_valid_imp((request, validity) in request_strategy()) {
        let adapter = RxAdapter::new("http://rx.test/bid");
        let (reqs, errs) = adapter.make_requests(&request);

        let valid_count = validity.iter().filter(|v| **v).count();
        prop_assert_eq!(reqs.len(), valid_count);
        prop_assert_eq!(errs.len(), request.imp.len() - valid_count);
        prop_assert!(errs.iter().all(|e| e.kind() == ErrorKind::InputValidation));

        let expected: Vec<&Imp> = request
            .imp
            .iter()
            .zip(&validity)
            .filter(|(_, valid)| **valid)
            .map(|(imp, _)| imp)
            .collect();

        for (r, original) in reqs.iter().zip(expected) {
            let body: BidRequest = serde_json::from_slice(&r.body).unwrap();
            prop_assert_eq!(&body.id, &request.id);
            prop_assert_eq!(body.imp.len(), 1);
            prop_assert_eq!(&body.imp[0], original);
            prop_assert_eq!(&body.device, &request.device);
            prop_assert_eq!(&body.user, &request.user);
            prop_assert!(body.cur.is_none());
        }
    }

    #[test]
    fn bids_answer_the_outbound_imp(prices in proptest::collection::vec(0u32..5, 1..6)) {
        let adapter = RxAdapter::new("http://rx.test/bid");
        let request = BidRequest {
            id: "prop-request".to_string(),
            imp: vec![Imp {
                id: "only-imp".to_string(),
                ext: Some(json!({"bidder": {"adspot_id": 7}})),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (reqs, _) = adapter.make_requests(&request);
        let outbound: BidRequest = serde_json::from_slice(&reqs[0].body).unwrap();

        let bids: Vec<_> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                json!({
                    "id": format!("b{}", i),
                    "impid": "only-imp",
                    "price": f64::from(*p) / 10.0
                })
            })
            .collect();
        let body = json!({"id": "prop-request", "seatbid": [{"bid": bids}]}).to_string();

        let (typed, errs) = adapter.make_bids(&request, &reqs[0], &ResponseData::new(200, body));
        prop_assert!(errs.is_empty());
        prop_assert_eq!(typed.len(), prices.iter().filter(|p| **p > 0).count());
        for t in &typed {
            prop_assert!(t.bid.price > 0.0);
            prop_assert!(outbound.imp.iter().any(|imp| imp.id == t.bid.impid));
        }
    }
}
