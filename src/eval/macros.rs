macro_rules! try_or_exit {
	( $e:expr ) => {
		match $e {
			Ok(v) => v,
			Err(e) => return Control::Exit(e.into()),
		}
	};
}

macro_rules! pop_u256 {
	( $machine:expr, $( $x:ident ),* ) => (
		$(
			let $x = $machine.stack.pop();
		)*
	);
}

macro_rules! push_u256 {
	( $machine:expr, $( $x:expr ),* ) => (
		$(
			$machine.stack.push($x);
		)*
	);
}

macro_rules! as_usize_or_fail {
	( $v:expr ) => {
		try_or_exit!($crate::utils::u256_to_usize($v))
	};
	( $v:expr, $reason:expr ) => {
		match $crate::utils::u256_to_usize($v) {
			Ok(v) => v,
			Err(_) => return Control::Exit($reason.into()),
		}
	};
}

macro_rules! op1_u256_fn {
	( $machine:expr, $op:path ) => {{
		pop_u256!($machine, op1);
		push_u256!($machine, $op(op1));

		Control::Continue
	}};
}

macro_rules! op2_u256 {
	( $machine:expr, $op:ident ) => {{
		pop_u256!($machine, op1, op2);
		push_u256!($machine, op1.$op(op2));

		Control::Continue
	}};
}

macro_rules! op2_u256_tuple {
	( $machine:expr, $op:ident ) => {{
		pop_u256!($machine, op1, op2);
		let (ret, ..) = op1.$op(op2);
		push_u256!($machine, ret);

		Control::Continue
	}};
}

macro_rules! op2_u256_fn {
	( $machine:expr, $op:path ) => {{
		pop_u256!($machine, op1, op2);
		push_u256!($machine, $op(op1, op2));

		Control::Continue
	}};
}

macro_rules! op2_u256_bool_ref {
	( $machine:expr, $op:ident ) => {{
		pop_u256!($machine, op1, op2);
		let ret = op1.$op(&op2);
		push_u256!($machine, if ret { U256::one() } else { U256::zero() });

		Control::Continue
	}};
}

macro_rules! op3_u256_fn {
	( $machine:expr, $op:path ) => {{
		pop_u256!($machine, op1, op2, op3);
		push_u256!($machine, $op(op1, op2, op3));

		Control::Continue
	}};
}
