use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tablestack_api::services::messaging::{KeywordOrderParser, TextUnderstandingStrategy};

#[rstest]
#[case("2x Margherita Pizza", dec!(2), "Margherita Pizza", None)]
#[case("2 x Margherita Pizza", dec!(2), "Margherita Pizza", None)]
#[case("2 Margherita Pizza", dec!(2), "Margherita Pizza", None)]
#[case("1 Tiramisu @ 4.50", dec!(1), "Tiramisu", Some(dec!(4.50)))]
#[case("3X Espresso @ 1.20", dec!(3), "Espresso", Some(dec!(1.20)))]
#[case("0.5 Parmesan @ 12", dec!(0.5), "Parmesan", Some(dec!(12)))]
fn quantity_prefix_forms_parse_to_one_line(
    #[case] message: &str,
    #[case] quantity: Decimal,
    #[case] name: &str,
    #[case] price: Option<Decimal>,
) {
    let parsed = KeywordOrderParser
        .parse(message)
        .expect("message should parse as order");
    assert_eq!(parsed.lines.len(), 1);
    assert_eq!(parsed.lines[0].quantity, quantity);
    assert_eq!(parsed.lines[0].name, name);
    assert_eq!(parsed.lines[0].price, price);
}

#[rstest]
#[case("hello, are you open tonight?")]
#[case("do you deliver to Alameda?")]
#[case("0x Margherita Pizza")]
#[case("-2 Margherita Pizza")]
#[case("")]
fn chatter_and_invalid_quantities_are_not_orders(#[case] message: &str) {
    assert!(KeywordOrderParser.parse(message).is_none());
}

#[rstest]
fn customer_name_line_is_lifted_out_of_the_order() {
    let parsed = KeywordOrderParser
        .parse("name: Ana Silva\n2x Margherita Pizza\n1 Tiramisu @ 4.50")
        .unwrap();
    assert_eq!(parsed.customer_name.as_deref(), Some("Ana Silva"));
    assert_eq!(parsed.lines.len(), 2);
}
