pub fn system_prompt() -> String {
    "You are a comparison analyst. Given a list of items, you produce a structured, \
objective side-by-side comparison.\n\n\
Rules:\n\
- Dynamically choose the attributes that matter most for these specific items \
(e.g. cars: Speed, Safety, Price; frameworks: Performance, Ecosystem, Learning Curve).\n\
- Use between 4 and 8 attributes so the comparison charts well.\n\
- For every attribute give one short description per item, in the same order as the items.\n\
- Score every item from 1 to 10 per attribute (10 = best / highest positive impact).\n\
- winnerIndex is the 0-based index of the best item for that attribute, or -1 for a tie \
or a purely subjective call.\n\
- If the items are abstract concepts (e.g. \"Love vs Money\"), compare them philosophically \
but keep the same structure.\n\n\
Output ONLY a JSON object with the fields items, summary, verdict and criteria, nothing else."
        .to_string()
}

pub fn user_message(items: &[String]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("Compare the following items: ");
    out.push_str(&items.join(", "));
    out.push_str(".\n\n");
    out.push_str("Return the items array with their names normalized if necessary, in this order:\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{i}. {item}\n"));
    }
    out.push_str("\nBe objective, smart, and context-aware.");
    out
}
