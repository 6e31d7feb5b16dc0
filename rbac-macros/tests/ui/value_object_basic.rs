use rbac_macros::value_object;

#[value_object]
struct Label {
    value: String,
}

#[value_object(debug = false)]
struct NonDebugVO(i32);

#[value_object]
enum Level {
    #[default]
    Low,
    High,
}

#[value_object(try_from = u8)]
struct Percent(u8);

impl TryFrom<u8> for Percent {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 100 {
            return Err(format!("{value} > 100"));
        }
        Ok(Self(value))
    }
}

fn main() {
    let a = Label::default();
    let _b = a.clone();
    let _ = format!("{:?}", a);
    let _eq = a == Label { value: String::new() };

    let _ = NonDebugVO(1);

    let _lv: Level = Default::default();
    let _ = Level::High;

    let _p = Percent(50);
}
